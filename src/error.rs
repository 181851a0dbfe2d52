//! Error taxonomy for the request-processing pipeline.
//!
//! Dependency failures propagate to the HTTP boundary, which logs the full
//! detail server-side and returns a generic internal error to the caller.
//! A blocked query is not an error: the injection stage handles it inside
//! the pipeline and produces a normal response.

use thiserror::Error;

/// A hard dependency failure inside a pipeline stage.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The vector index is empty or the embedding backend is unreachable.
    #[error("retrieval unavailable: {0}")]
    RetrievalUnavailable(anyhow::Error),

    /// The cross-encoder reranker is unreachable or returned bad data.
    #[error("reranker unavailable: {0}")]
    RerankUnavailable(anyhow::Error),

    /// The text-generation backend is unreachable or returned an error.
    #[error("generation unavailable: {0}")]
    GenerationUnavailable(anyhow::Error),
}
