//! # wiki-qa
//!
//! A Rust web service answering natural-language questions over a private
//! document corpus: retrieve relevant passages, optionally re-rank them,
//! generate a grounded answer, and scrub the answer for PII before it
//! leaves the service.
//!
//! ## Architecture
//!
//! Each request runs through a fixed stage sequence over one shared
//! request state:
//!
//! ```text
//!              ┌──────────────────┐
//!              │  Injection Check │
//!              └────────┬─────────┘
//!          blocked │    │ safe
//!                  │    ▼
//!                  │  ┌──────────────────┐
//!                  │  │     Retrieve     │  top_k = 20 if rerank, else k
//!                  │  └────────┬─────────┘
//!                  │           ▼
//!                  │  ┌──────────────────┐
//!                  │  │      Rerank      │  optional, narrows to k
//!                  │  └────────┬─────────┘
//!                  │           ▼
//!                  │  ┌──────────────────┐
//!                  │  │     Generate     │  temp 0.0, context-only
//!                  │  └────────┬─────────┘
//!                  │           ▼
//!                  │  ┌──────────────────┐
//!                  │  │    PII Scrub     │
//!                  │  └────────┬─────────┘
//!                  ▼           ▼
//!              ┌──────────────────┐
//!              │       Done       │
//!              └──────────────────┘
//! ```
//!
//! A blocked query jumps straight to Done with a fixed warning answer;
//! every later stage also treats a blocked state as a pass-through, so
//! invoking any stage directly with a blocked state stays safe.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, corpus dirs, and model backends
//! - [`models`] - Boundary types: `AskRequest`, `AskResponse`, `Citation`, health/ingest responses
//! - [`error`] - `PipelineError`: the dependency-failure taxonomy
//! - [`safety`] - Injection guard and PII scrubber (fixed regex catalogues)
//! - [`pipeline`] - Request state, stage FSM, orchestrator, and the component trait seams
//! - [`index`] - In-memory vector index with cosine similarity and disk persistence
//! - [`llm`] - HTTP clients for embeddings, chat completion, and cross-encoder scoring
//! - [`rag`] - Concrete retriever, reranker, and generator implementations
//! - [`ingest`] - Corpus ingestion: load markdown → overlapping chunks → embed → index
//! - [`api`] - Axum HTTP handlers for ask, ingest, and health
//! - [`state`] - Shared application state wiring components together

pub mod api;
pub mod config;
pub mod error;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod models;
pub mod pipeline;
pub mod rag;
pub mod safety;
pub mod state;
