use async_trait::async_trait;
use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::PipelineError;
use crate::index::VectorIndex;
use crate::llm::embeddings;
use crate::pipeline::{Candidate, Retriever};

/// Semantic search over the pre-built vector index: embed the query with
/// the same model that indexed the corpus, then k-NN by cosine similarity.
pub struct DocumentRetriever {
    client: reqwest::Client,
    llm_config: LlmConfig,
    index: Arc<VectorIndex>,
}

impl DocumentRetriever {
    pub fn new(client: reqwest::Client, llm_config: LlmConfig, index: Arc<VectorIndex>) -> Self {
        Self {
            client,
            llm_config,
            index,
        }
    }
}

#[async_trait]
impl Retriever for DocumentRetriever {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<Candidate>, PipelineError> {
        // An empty index must fail loudly: a silent empty list would be
        // indistinguishable from "no relevant content".
        if self.index.is_empty() {
            return Err(PipelineError::RetrievalUnavailable(anyhow::anyhow!(
                "vector index is empty; run ingestion first"
            )));
        }

        let query_embedding = embeddings::embed_single(&self.client, &self.llm_config, query)
            .await
            .map_err(PipelineError::RetrievalUnavailable)?;

        let candidates: Vec<Candidate> = self
            .index
            .search(&query_embedding, top_k)
            .into_iter()
            .map(|hit| Candidate {
                text: hit.text,
                source: hit.source,
                score: hit.score,
                rerank_score: None,
                original_score: None,
            })
            .collect();

        tracing::info!("Retrieved top-{} of {} indexed chunks", candidates.len(), self.index.entry_count());
        Ok(candidates)
    }
}
