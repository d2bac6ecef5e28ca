//! Audit emission for completed analyses
//!
//! Each result produces one structured event on the `audit` tracing target
//! and one write-once row in `audit_log`.

use chrono::Utc;
use raflift_common::db::{insert_audit_record, AuditRecord};
use sqlx::SqlitePool;
use tracing::info;

use crate::analysis::AnalyzeResult;

/// Tracing target for audit events
pub const AUDIT_TARGET: &str = "audit";

/// Audit record for a result, timestamped now
pub fn audit_record_for(result: &AnalyzeResult) -> AuditRecord {
    AuditRecord {
        audit_uuid: result.audit_uuid(),
        chart_id: result.chart_id().to_string(),
        hcc_code: result.hcc_code().to_string(),
        raf_lift: result.raf_lift(),
        integrity_hash: result.integrity_hash().to_string(),
        recorded_at: Utc::now(),
    }
}

/// Log and store the audit record for `result`
pub async fn emit(pool: &SqlitePool, result: &AnalyzeResult) -> raflift_common::Result<AuditRecord> {
    let record = audit_record_for(result);

    insert_audit_record(pool, &record).await?;

    info!(
        target: AUDIT_TARGET,
        audit_uuid = %record.audit_uuid,
        chart_id = %record.chart_id,
        hcc_code = %record.hcc_code,
        raf_lift = record.raf_lift,
        integrity_hash = %record.integrity_hash,
        recorded_at = %record.recorded_at.to_rfc3339(),
        "analysis recorded"
    );

    Ok(record)
}
