//! Concrete pipeline components: retrieval over the vector index, the
//! cross-encoder reranker, and grounded answer generation.

pub mod generation;
pub mod retrieval;
pub mod reranker;

pub use generation::AnswerGenerator;
pub use retrieval::DocumentRetriever;
pub use reranker::CrossEncoderReranker;
