//! Trait seams for the three external scoring oracles. The orchestrator
//! owns them as trait objects so every stage is testable with substitute
//! implementations and no component reaches for a hidden global.

use async_trait::async_trait;

use crate::error::PipelineError;
use crate::pipeline::state::Candidate;

/// Nearest-neighbor search over the pre-built vector index.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return up to `top_k` candidates sorted descending by similarity.
    /// An empty or unreachable index is `RetrievalUnavailable`, never a
    /// silently empty list.
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Candidate>, PipelineError>;
}

/// Pairwise relevance re-scoring of a small candidate set.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Score every (query, text) pair, preserve the prior score as
    /// `original_score`, sort descending by `rerank_score`, and truncate to
    /// `top_k`. An empty input is returned unchanged.
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<Candidate>,
        top_k: usize,
    ) -> Result<Vec<Candidate>, PipelineError>;
}

/// Grounded answer generation from the query and candidate passages.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        query: &str,
        candidates: &[Candidate],
    ) -> Result<String, PipelineError>;
}
