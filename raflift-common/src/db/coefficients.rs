//! HCC coefficient reference store
//!
//! The table is read once at startup into a [`CoefficientTable`], which is
//! immutable afterwards and shared across requests without locking.

use super::models::CoefficientEntry;
use crate::Result;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

/// Canonical spelling of an HCC code: `HCC<digits>`, uppercase, no
/// separator, leading zeros dropped (`hcc-085` → `HCC85`)
///
/// Anything that isn't `HCC` + optional space/hyphen + digits is only
/// trimmed and uppercased.
pub fn normalize_code(code: &str) -> String {
    let upper = code.trim().to_ascii_uppercase();
    if let Some(rest) = upper.strip_prefix("HCC") {
        let rest = rest.strip_prefix([' ', '-']).unwrap_or(rest);
        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            let digits = rest.trim_start_matches('0');
            return format!("HCC{}", if digits.is_empty() { "0" } else { digits });
        }
    }
    upper
}

/// Immutable in-memory view of `hcc_coefficients`, keyed by hcc_code
///
/// Also indexed by [`normalize_code`] of each stored key. When two stored
/// keys normalize alike, the lexicographically smaller one owns the slot.
#[derive(Debug, Clone, Default)]
pub struct CoefficientTable {
    entries: BTreeMap<String, f64>,
    by_normalized: BTreeMap<String, String>,
}

impl CoefficientTable {
    pub fn from_entries(entries: impl IntoIterator<Item = CoefficientEntry>) -> Self {
        let entries: BTreeMap<String, f64> = entries
            .into_iter()
            .map(|e| (e.hcc_code, e.coefficient))
            .collect();

        let mut by_normalized = BTreeMap::new();
        for code in entries.keys() {
            by_normalized
                .entry(normalize_code(code))
                .or_insert_with(|| code.clone());
        }

        Self {
            entries,
            by_normalized,
        }
    }

    /// Lookup by any spelling of a code; the entry carries the stored key
    pub fn get_normalized(&self, code: &str) -> Option<CoefficientEntry> {
        self.by_normalized
            .get(&normalize_code(code))
            .and_then(|stored| self.get(stored))
    }

    /// Exact lookup by code, e.g. "HCC85"
    pub fn get(&self, hcc_code: &str) -> Option<CoefficientEntry> {
        self.entries
            .get_key_value(hcc_code)
            .map(|(code, coefficient)| CoefficientEntry {
                hcc_code: code.clone(),
                coefficient: *coefficient,
            })
    }

    pub fn contains(&self, hcc_code: &str) -> bool {
        self.entries.contains_key(hcc_code)
    }

    /// Known codes in sorted order
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Load the full coefficient table
pub async fn load_coefficients(pool: &SqlitePool) -> Result<CoefficientTable> {
    let rows = sqlx::query_as::<_, CoefficientEntry>(
        "SELECT hcc_code, coefficient FROM hcc_coefficients ORDER BY hcc_code ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(CoefficientTable::from_entries(rows))
}

/// Single-code lookup against the database
pub async fn get_coefficient(pool: &SqlitePool, hcc_code: &str) -> Result<Option<CoefficientEntry>> {
    let row = sqlx::query_as::<_, CoefficientEntry>(
        "SELECT hcc_code, coefficient FROM hcc_coefficients WHERE hcc_code = ?",
    )
    .bind(hcc_code)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
