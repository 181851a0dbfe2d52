//! HTTP clients for the external model backends: embeddings and chat
//! completion against Ollama or an OpenAI-compatible API, and pairwise
//! relevance scoring against a cross-encoder rerank sidecar.

pub mod chat;
pub mod cross_encoder;
pub mod embeddings;
