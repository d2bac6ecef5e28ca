//! Audit lookup endpoint
//!
//! GET /v28/audit/:audit_uuid returns a stored audit record and whether its
//! integrity hash still matches the stored structured fields.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use raflift_common::db::{get_audit_record, AuditRecord};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Audit lookup response
#[derive(Debug, Serialize)]
pub struct AuditResponse {
    #[serde(flatten)]
    pub record: AuditRecord,
    /// Recomputed hash equals the stored hash
    pub verified: bool,
}

/// GET /v28/audit/:audit_uuid
pub async fn get_audit(
    State(state): State<AppState>,
    Path(audit_uuid): Path<String>,
) -> ApiResult<Json<AuditResponse>> {
    let audit_uuid = Uuid::parse_str(&audit_uuid)
        .map_err(|_| ApiError::BadRequest(format!("Invalid audit_uuid: {}", audit_uuid)))?;

    let record = get_audit_record(&state.db, audit_uuid)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("audit record {}", audit_uuid)))?;

    let verified = record.verify();
    if !verified {
        tracing::warn!(%audit_uuid, "Audit record failed integrity verification");
    }

    Ok(Json(AuditResponse { record, verified }))
}

/// Build audit routes
pub fn audit_routes() -> Router<AppState> {
    Router::new().route("/v28/audit/:audit_uuid", get(get_audit))
}
