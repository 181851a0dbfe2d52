//! Cross-encoder pair scoring via an OpenAI-compatible `/v1/rerank`
//! endpoint (e.g. llama-server running a reranker model).
//!
//! One batch request scores every (query, document) pair. Scores are
//! model-native floats with no fixed range; only relative order matters,
//! so no normalization is applied.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::RerankerConfig;

/// Score every document against the query. The returned vector is parallel
/// with `documents`: `scores[i]` belongs to `documents[i]`.
pub async fn score_pairs(
    client: &reqwest::Client,
    config: &RerankerConfig,
    query: &str,
    documents: &[String],
) -> Result<Vec<f32>> {
    let base_url = config
        .base_url
        .as_deref()
        .context("Reranker base_url not configured")?;

    let model = config.model.as_deref().unwrap_or("default");

    let url = format!("{}/v1/rerank", base_url.trim_end_matches('/'));

    let req_body = RerankRequest {
        model: model.to_string(),
        query: query.to_string(),
        documents: documents.to_vec(),
        // Ask for every pair back; truncation happens pipeline-side
        top_n: documents.len(),
    };

    let timeout = std::time::Duration::from_secs(config.timeout_secs.min(30));

    let resp = client
        .post(&url)
        .timeout(timeout)
        .json(&req_body)
        .send()
        .await
        .context("Failed to reach reranker endpoint")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Reranker returned {status}: {body}");
    }

    let body: RerankResponse = resp
        .json()
        .await
        .context("Failed to parse reranker response")?;

    align_scores(body.results, documents.len())
}

/// Map `(index, score)` results back onto input order, rejecting responses
/// that leave any document unscored.
fn align_scores(results: Vec<RerankResultRaw>, n: usize) -> Result<Vec<f32>> {
    let mut scores: Vec<Option<f32>> = vec![None; n];
    for r in results {
        if r.index < n {
            scores[r.index] = Some(r.relevance_score);
        }
    }

    scores
        .into_iter()
        .enumerate()
        .map(|(i, s)| s.with_context(|| format!("Reranker returned no score for document {i}")))
        .collect()
}

// ─── Request/Response types ────────────────────────────

#[derive(Serialize)]
struct RerankRequest {
    model: String,
    query: String,
    documents: Vec<String>,
    top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankResultRaw>,
}

#[derive(Deserialize)]
struct RerankResultRaw {
    index: usize,
    relevance_score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_scores_restores_input_order() {
        let results = vec![
            RerankResultRaw {
                index: 2,
                relevance_score: 0.9,
            },
            RerankResultRaw {
                index: 0,
                relevance_score: 0.1,
            },
            RerankResultRaw {
                index: 1,
                relevance_score: 0.5,
            },
        ];
        let scores = align_scores(results, 3).unwrap();
        assert_eq!(scores, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn test_align_scores_rejects_missing_document() {
        let results = vec![RerankResultRaw {
            index: 0,
            relevance_score: 0.4,
        }];
        assert!(align_scores(results, 2).is_err());
    }

    #[test]
    fn test_align_scores_ignores_out_of_range_index() {
        let results = vec![
            RerankResultRaw {
                index: 0,
                relevance_score: 0.4,
            },
            RerankResultRaw {
                index: 7,
                relevance_score: 0.9,
            },
        ];
        let scores = align_scores(results, 1).unwrap();
        assert_eq!(scores, vec![0.4]);
    }
}
