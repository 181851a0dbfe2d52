use async_trait::async_trait;

use crate::config::RerankerConfig;
use crate::error::PipelineError;
use crate::llm::cross_encoder;
use crate::pipeline::{Candidate, Reranker};

/// Re-scores a candidate set with a cross-encoder. This is a full
/// re-scoring, not a merge: once it runs, the retrieval score has no
/// influence on the final order.
pub struct CrossEncoderReranker {
    client: reqwest::Client,
    config: RerankerConfig,
}

impl CrossEncoderReranker {
    pub fn new(client: reqwest::Client, config: RerankerConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Reranker for CrossEncoderReranker {
    async fn rerank(
        &self,
        query: &str,
        candidates: Vec<Candidate>,
        top_k: usize,
    ) -> Result<Vec<Candidate>, PipelineError> {
        // Degenerate no-op, not an error
        if candidates.is_empty() {
            return Ok(candidates);
        }

        let documents: Vec<String> = candidates.iter().map(|c| c.text.clone()).collect();
        let scores = cross_encoder::score_pairs(&self.client, &self.config, query, &documents)
            .await
            .map_err(PipelineError::RerankUnavailable)?;

        Ok(apply_rerank(candidates, &scores, top_k))
    }
}

/// Attach rerank scores (parallel with `candidates`), preserve the prior
/// score as `original_score`, sort descending by rerank score, and truncate
/// to `top_k`.
fn apply_rerank(mut candidates: Vec<Candidate>, scores: &[f32], top_k: usize) -> Vec<Candidate> {
    for (candidate, score) in candidates.iter_mut().zip(scores) {
        candidate.original_score = Some(candidate.score);
        candidate.rerank_score = Some(*score);
    }

    candidates.sort_by(|a, b| {
        b.rerank_score
            .partial_cmp(&a.rerank_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    candidates.truncate(top_k);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, score: f32) -> Candidate {
        Candidate {
            text: text.to_string(),
            source: "doc.md".to_string(),
            score,
            rerank_score: None,
            original_score: None,
        }
    }

    #[test]
    fn test_apply_rerank_sorts_descending() {
        let candidates = vec![candidate("a", 0.9), candidate("b", 0.8), candidate("c", 0.7)];
        let reranked = apply_rerank(candidates, &[0.1, 2.5, 1.0], 10);

        let texts: Vec<&str> = reranked.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_apply_rerank_preserves_original_score() {
        let candidates = vec![candidate("a", 0.9), candidate("b", 0.8)];
        let reranked = apply_rerank(candidates, &[-1.0, 3.0], 10);

        let b = reranked.iter().find(|c| c.text == "b").unwrap();
        assert_eq!(b.original_score, Some(0.8));
        assert_eq!(b.rerank_score, Some(3.0));
    }

    #[test]
    fn test_apply_rerank_truncates_to_top_k() {
        let candidates: Vec<Candidate> = (0..20)
            .map(|i| candidate(&format!("c{i}"), 0.5))
            .collect();
        let scores: Vec<f32> = (0..20).map(|i| i as f32).collect();

        let reranked = apply_rerank(candidates, &scores, 5);
        assert_eq!(reranked.len(), 5);
        assert_eq!(reranked[0].rerank_score, Some(19.0));
    }

    #[test]
    fn test_retrieval_order_has_no_influence() {
        // Same scores, opposite retrieval order: final order must match
        // the rerank scores alone.
        let forward = apply_rerank(
            vec![candidate("a", 0.99), candidate("b", 0.01)],
            &[1.0, 2.0],
            10,
        );
        assert_eq!(forward[0].text, "b");
    }

    #[test]
    fn test_negative_model_native_scores() {
        // Cross-encoder logits can be negative; only relative order matters
        let reranked = apply_rerank(
            vec![candidate("a", 0.5), candidate("b", 0.5)],
            &[-4.2, -1.1],
            10,
        );
        assert_eq!(reranked[0].text, "b");
    }
}
