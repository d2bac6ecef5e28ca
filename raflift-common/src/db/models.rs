//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub title: Option<String>,
    pub owner_id: Option<i64>,
}

/// One row of the HCC coefficient reference table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CoefficientEntry {
    pub hcc_code: String,
    pub coefficient: f64,
}

/// Write-once audit record for a completed analysis
///
/// Structured fields only; the note text is never part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub audit_uuid: Uuid,
    pub chart_id: String,
    pub hcc_code: String,
    pub raf_lift: f64,
    pub integrity_hash: String,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Recompute the integrity hash from the stored fields and compare
    pub fn verify(&self) -> bool {
        crate::integrity::verify(
            &self.chart_id,
            &self.hcc_code,
            self.raf_lift,
            &self.integrity_hash,
        )
    }
}
