//! The request-processing pipeline: an explicit finite-state machine
//! driving injection check → retrieve → rerank → generate → PII scrub.
//!
//! Each stage consumes the current state snapshot and returns the next
//! stage together with a new snapshot. The orchestrator owns the safety
//! filters and the three scoring oracles; no stage calls another directly.

pub mod state;
pub mod traits;

use std::sync::Arc;

use crate::error::PipelineError;
use crate::safety::{InjectionGuard, PiiScrubber};

pub use state::{Candidate, RequestMetadata, RequestState};
pub use traits::{Generator, Reranker, Retriever};

/// Answer returned for a blocked query. A block is a policy outcome, not a
/// failure: it surfaces as a normal response.
pub const BLOCKED_ANSWER: &str =
    "I cannot process this request because it appears to contain a prompt injection attempt.";

/// Error string recorded on the blocked path so downstream consumers can
/// distinguish early termination from a normal completion.
pub const BLOCKED_ERROR: &str = "query blocked by injection guard";

/// Candidates fetched before reranking narrows the set down.
const RERANK_FETCH_K: usize = 20;

/// Pipeline stages, in fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    InjectionCheck,
    Retrieve,
    Rerank,
    Generate,
    Scrub,
    Done,
}

/// Orchestrates the stage sequence over a per-request [`RequestState`].
pub struct Pipeline {
    guard: InjectionGuard,
    scrubber: PiiScrubber,
    retriever: Arc<dyn Retriever>,
    reranker: Arc<dyn Reranker>,
    generator: Arc<dyn Generator>,
}

impl Pipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        reranker: Arc<dyn Reranker>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            guard: InjectionGuard::new(),
            scrubber: PiiScrubber::new(),
            retriever,
            reranker,
            generator,
        }
    }

    /// Run one question through the full stage sequence.
    ///
    /// A blocked query completes normally with [`BLOCKED_ANSWER`];
    /// dependency failures propagate as [`PipelineError`].
    pub async fn run(
        &self,
        query: &str,
        top_k: usize,
        use_rerank: bool,
    ) -> Result<RequestState, PipelineError> {
        let mut state = RequestState::new(query, top_k, use_rerank);
        let mut stage = Stage::InjectionCheck;

        while stage != Stage::Done {
            let (next, new_state) = self.step(stage, state).await?;
            stage = next;
            state = new_state;
        }

        Ok(state)
    }

    /// The typed transition function: one stage in, (next stage, new state)
    /// out. Every stage after InjectionCheck treats `is_safe == false` as a
    /// pass-through so that direct invocation with a blocked state is safe,
    /// even though the blocked path already jumps straight to Done.
    async fn step(
        &self,
        stage: Stage,
        state: RequestState,
    ) -> Result<(Stage, RequestState), PipelineError> {
        match stage {
            Stage::InjectionCheck => Ok(self.injection_check(state)),
            Stage::Retrieve => Ok((Stage::Rerank, self.retrieve(state).await?)),
            Stage::Rerank => Ok((Stage::Generate, self.rerank(state).await?)),
            Stage::Generate => Ok((Stage::Scrub, self.generate(state).await?)),
            Stage::Scrub => Ok((Stage::Done, self.scrub(state))),
            Stage::Done => Ok((Stage::Done, state)),
        }
    }

    fn injection_check(&self, mut state: RequestState) -> (Stage, RequestState) {
        let report = self.guard.check(&state.query);
        state
            .metadata
            .record_injection_check(report.risk_level, report.detected_patterns);

        if report.is_safe {
            (Stage::Retrieve, state)
        } else {
            // Jump straight to Done: retrieval, reranking, generation, and
            // scrubbing are all skipped for a blocked query.
            state.is_safe = false;
            state.answer = Some(BLOCKED_ANSWER.to_string());
            state.error = Some(BLOCKED_ERROR.to_string());
            (Stage::Done, state)
        }
    }

    async fn retrieve(&self, mut state: RequestState) -> Result<RequestState, PipelineError> {
        if !state.is_safe {
            return Ok(state);
        }

        let top_k = if state.use_rerank {
            RERANK_FETCH_K
        } else {
            state.top_k
        };

        let candidates = self.retriever.retrieve(&state.query, top_k).await?;
        tracing::info!("Retrieved {} candidates", candidates.len());

        state.metadata.record_retrieval_count(candidates.len());
        state.candidates = candidates;
        Ok(state)
    }

    async fn rerank(&self, mut state: RequestState) -> Result<RequestState, PipelineError> {
        if !state.is_safe || !state.use_rerank {
            return Ok(state);
        }

        let candidates = std::mem::take(&mut state.candidates);
        state.candidates = self
            .reranker
            .rerank(&state.query, candidates, state.top_k)
            .await?;
        tracing::info!("Reranked to {} candidates", state.candidates.len());

        state.metadata.record_reranked();
        Ok(state)
    }

    async fn generate(&self, mut state: RequestState) -> Result<RequestState, PipelineError> {
        if !state.is_safe {
            return Ok(state);
        }

        let answer = self
            .generator
            .generate(&state.query, &state.candidates)
            .await?;
        state.answer = Some(answer);
        Ok(state)
    }

    fn scrub(&self, mut state: RequestState) -> RequestState {
        if !state.is_safe {
            return state;
        }

        // Blocked-earlier states carry no generated answer; leave them alone.
        let Some(answer) = state.answer.take() else {
            return state;
        };

        let result = self.scrubber.scrub(&answer);
        state
            .metadata
            .record_scrub(result.was_scrubbed, result.pii_detected);
        state.answer = Some(result.text);
        state
    }
}
