//! Write-once audit log
//!
//! Rows are inserted once and never updated. Inserting an audit_uuid that
//! already exists is an error rather than an overwrite.

use super::models::AuditRecord;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Insert a new audit record
pub async fn insert_audit_record(pool: &SqlitePool, record: &AuditRecord) -> Result<()> {
    let result = sqlx::query(
        r#"
        INSERT INTO audit_log (audit_uuid, chart_id, hcc_code, raf_lift, integrity_hash, recorded_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.audit_uuid.to_string())
    .bind(&record.chart_id)
    .bind(&record.hcc_code)
    .bind(record.raf_lift)
    .bind(&record.integrity_hash)
    .bind(record.recorded_at.to_rfc3339())
    .execute(pool)
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(Error::InvalidInput(
            format!("audit record {} already exists", record.audit_uuid),
        )),
        Err(e) => Err(e.into()),
    }
}

/// Fetch an audit record by id
pub async fn get_audit_record(pool: &SqlitePool, audit_uuid: Uuid) -> Result<Option<AuditRecord>> {
    let row = sqlx::query_as::<_, (String, String, String, f64, String, String)>(
        r#"
        SELECT audit_uuid, chart_id, hcc_code, raf_lift, integrity_hash, recorded_at
        FROM audit_log
        WHERE audit_uuid = ?
        "#,
    )
    .bind(audit_uuid.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(record_from_row).transpose()
}

/// All audit records for a chart, oldest first
pub async fn audit_records_for_chart(pool: &SqlitePool, chart_id: &str) -> Result<Vec<AuditRecord>> {
    let rows = sqlx::query_as::<_, (String, String, String, f64, String, String)>(
        r#"
        SELECT audit_uuid, chart_id, hcc_code, raf_lift, integrity_hash, recorded_at
        FROM audit_log
        WHERE chart_id = ?
        ORDER BY recorded_at ASC
        "#,
    )
    .bind(chart_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(record_from_row).collect()
}

fn record_from_row(
    (audit_uuid, chart_id, hcc_code, raf_lift, integrity_hash, recorded_at): (
        String,
        String,
        String,
        f64,
        String,
        String,
    ),
) -> Result<AuditRecord> {
    let audit_uuid = Uuid::parse_str(&audit_uuid)
        .map_err(|e| Error::Internal(format!("Corrupt audit_uuid in audit_log: {}", e)))?;
    let recorded_at = DateTime::parse_from_rfc3339(&recorded_at)
        .map_err(|e| Error::Internal(format!("Corrupt recorded_at in audit_log: {}", e)))?
        .with_timezone(&Utc);

    Ok(AuditRecord {
        audit_uuid,
        chart_id,
        hcc_code,
        raf_lift,
        integrity_hash,
        recorded_at,
    })
}
