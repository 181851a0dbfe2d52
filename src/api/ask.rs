use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::api::require_api_key;
use crate::models::{AskRequest, AskResponse, Citation};
use crate::pipeline::{Candidate, RequestState};
use crate::state::AppState;

const PREVIEW_CHARS: usize = 200;

/// POST /ask - Answer a question with citations.
///
/// Validation and authentication happen here at the boundary; dependency
/// failures inside the pipeline surface as a generic 500 with the full
/// detail logged server-side only.
pub async fn ask(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, String)> {
    require_api_key(&headers, &state.config.api_shared_secret)?;
    req.validate().map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let query = req.query.trim().to_string();
    tracing::info!("Received query ({} chars, top_k={}, use_rerank={})", query.chars().count(), req.top_k, req.use_rerank);

    let result = state
        .pipeline
        .run(&query, req.top_k, req.use_rerank)
        .await
        .map_err(|e| {
            tracing::error!("Pipeline failure: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
        })?;

    Ok(Json(build_response(&state, &req, result)))
}

fn build_response(state: &AppState, req: &AskRequest, result: RequestState) -> AskResponse {
    let citations = result
        .candidates
        .iter()
        .enumerate()
        .map(|(idx, c)| build_citation(idx, c))
        .collect();

    // Stage metadata plus the request echo the original API contract carries
    let mut metadata = serde_json::to_value(&result.metadata)
        .unwrap_or_else(|_| serde_json::json!({}));
    if let Some(map) = metadata.as_object_mut() {
        map.insert("query".into(), serde_json::json!(result.query));
        map.insert("top_k".into(), serde_json::json!(req.top_k));
        map.insert("use_rerank".into(), serde_json::json!(req.use_rerank));
        map.insert(
            "llm_backend".into(),
            serde_json::json!(state.config.llm.provider),
        );
    }

    AskResponse {
        answer: result.answer.unwrap_or_default(),
        citations,
        metadata,
    }
}

fn build_citation(idx: usize, candidate: &Candidate) -> Citation {
    // Extract the filename from a possibly nested source path
    let document = candidate
        .source
        .rsplit('/')
        .next()
        .unwrap_or(&candidate.source)
        .to_string();

    Citation {
        document,
        chunk_id: format!("chunk_{idx}"),
        text: preview(&candidate.text),
        // Rerank score wins when reranking ran
        score: candidate.rerank_score.unwrap_or(candidate.score),
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let truncated: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{truncated}...")
}
