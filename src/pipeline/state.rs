use serde::Serialize;

use crate::safety::{PiiCategory, RiskLevel};

/// One retrieved (or reranked) passage.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub text: String,
    /// Document identifier (source file path)
    pub source: String,
    /// Similarity after retrieval; higher = more relevant
    pub score: f32,
    /// Cross-encoder score, set only when reranking ran
    pub rerank_score: Option<f32>,
    /// Retrieval score preserved for audit once reranking overwrites the order
    pub original_score: Option<f32>,
}

/// Per-stage metadata, strictly additive: each stage records its own fields
/// and never clears one written by an earlier stage. The fixed field set
/// (one group per stage) enforces that at the type level.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RequestMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    injection_check: Option<InjectionCheckMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    retrieval_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reranked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pii_scrubbed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pii_detected: Option<Vec<PiiCategory>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InjectionCheckMetadata {
    pub risk_level: RiskLevel,
    pub detected_patterns: Vec<String>,
}

impl RequestMetadata {
    pub fn record_injection_check(&mut self, risk_level: RiskLevel, detected_patterns: Vec<String>) {
        debug_assert!(self.injection_check.is_none());
        self.injection_check = Some(InjectionCheckMetadata {
            risk_level,
            detected_patterns,
        });
    }

    pub fn record_retrieval_count(&mut self, count: usize) {
        debug_assert!(self.retrieval_count.is_none());
        self.retrieval_count = Some(count);
    }

    pub fn record_reranked(&mut self) {
        debug_assert!(self.reranked.is_none());
        self.reranked = Some(true);
    }

    pub fn record_scrub(&mut self, was_scrubbed: bool, pii_detected: Vec<PiiCategory>) {
        debug_assert!(self.pii_scrubbed.is_none());
        self.pii_scrubbed = Some(was_scrubbed);
        if !pii_detected.is_empty() {
            self.pii_detected = Some(pii_detected);
        }
    }

    pub fn retrieval_count(&self) -> Option<usize> {
        self.retrieval_count
    }

    pub fn reranked(&self) -> bool {
        self.reranked.unwrap_or(false)
    }

    pub fn pii_scrubbed(&self) -> Option<bool> {
        self.pii_scrubbed
    }

    pub fn injection_risk(&self) -> Option<RiskLevel> {
        self.injection_check.as_ref().map(|c| c.risk_level)
    }
}

/// The single mutable object threaded through the pipeline. Created per
/// incoming question, it flows through the stage sequence exactly once and
/// is discarded after the answer is extracted.
#[derive(Debug, Clone, Serialize)]
pub struct RequestState {
    /// User question; immutable after pipeline entry
    pub query: String,
    /// Requested citation count; immutable after pipeline entry
    pub top_k: usize,
    /// Client-requested reranking flag; immutable after pipeline entry
    pub use_rerank: bool,
    /// Set exactly once, by the injection stage
    pub is_safe: bool,
    /// Populated by retrieval, replaced (not merged) by reranking
    pub candidates: Vec<Candidate>,
    /// Set by the generator, or by the injection stage on block
    pub answer: Option<String>,
    /// Present only on a blocked/failed path
    pub error: Option<String>,
    pub metadata: RequestMetadata,
}

impl RequestState {
    pub fn new(query: impl Into<String>, top_k: usize, use_rerank: bool) -> Self {
        Self {
            query: query.into(),
            top_k,
            use_rerank,
            is_safe: true,
            candidates: Vec::new(),
            answer: None,
            error: None,
            metadata: RequestMetadata::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = RequestState::new("q", 5, false);
        assert!(state.is_safe);
        assert!(state.candidates.is_empty());
        assert!(state.answer.is_none());
        assert!(state.error.is_none());
    }

    #[test]
    fn test_metadata_fields_accumulate() {
        let mut meta = RequestMetadata::default();
        meta.record_retrieval_count(5);
        meta.record_reranked();
        meta.record_scrub(false, Vec::new());

        assert_eq!(meta.retrieval_count(), Some(5));
        assert!(meta.reranked());
        assert_eq!(meta.pii_scrubbed(), Some(false));
    }

    #[test]
    fn test_metadata_serializes_only_written_fields() {
        let mut meta = RequestMetadata::default();
        meta.record_retrieval_count(3);

        let json = serde_json::to_value(&meta).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["retrieval_count"], 3);
    }

    #[test]
    fn test_scrub_metadata_omits_empty_categories() {
        let mut meta = RequestMetadata::default();
        meta.record_scrub(false, Vec::new());

        let json = serde_json::to_value(&meta).unwrap();
        assert!(json.get("pii_detected").is_none());
        assert_eq!(json["pii_scrubbed"], false);
    }
}
