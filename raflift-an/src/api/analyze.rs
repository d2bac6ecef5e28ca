//! Analyze endpoint
//!
//! POST /v28/analyze maps a chart note to an HCC code and its RAF lift.
//! The note text is read, matched and dropped. It is never logged, stored
//! or returned.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{debug, info};

use crate::analysis::{analyze_request, AnalyzeRequest, AnalyzeResult};
use crate::error::{ApiError, ApiResult};
use crate::{audit, AppState};

/// POST /v28/analyze
pub async fn analyze_note(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<Json<AnalyzeResult>> {
    let Json(request) = payload?;

    debug!(
        chart_id = request.chart_id.as_deref().unwrap_or(""),
        note_bytes = request.note_text.as_ref().map(|n| n.len()).unwrap_or(0),
        "Analyze request received"
    );

    let result = analyze_request(&request, &state.coefficients, state.matcher.as_ref())
        .map_err(|e| {
            info!(
                chart_id = request.chart_id.as_deref().unwrap_or(""),
                "Analyze rejected: {}", e
            );
            ApiError::from(e)
        })?;
    drop(request);

    audit::emit(&state.db, &result)
        .await
        .map_err(|e| ApiError::Internal(format!("audit record not stored: {}", e)))?;

    Ok(Json(result))
}

/// Build analyze routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/v28/analyze", post(analyze_note))
}
