use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::api::require_api_key;
use crate::ingest::DocumentIngester;
use crate::models::IngestResponse;
use crate::state::AppState;

/// POST /ingest - Load, chunk, embed, and index the document corpus.
/// Admin endpoint, shared-secret protected.
pub async fn ingest(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<IngestResponse>, (StatusCode, String)> {
    require_api_key(&headers, &state.config.api_shared_secret)?;

    let ingester = DocumentIngester::new(
        state.http_client.clone(),
        state.config.clone(),
        state.index.clone(),
    );

    let report = ingester.ingest().await.map_err(|e| {
        tracing::error!("Ingestion failed: {e:#}");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
    })?;

    Ok(Json(IngestResponse {
        status: "success".to_string(),
        documents: report.documents,
        chunks: report.chunks,
    }))
}
