//! Integrity hashing for analyze results and audit records
//!
//! The hash covers the structured output fields only:
//! - chart_id
//! - hcc_code
//! - coefficient (the RAF lift)
//!
//! Canonical form is `chart_id|hcc_code|coefficient` with the coefficient in
//! Rust's shortest round-trip decimal form. hcc_code and the coefficient never
//! contain `|`, so splitting the canonical string from the right is
//! unambiguous even when chart_id does.
//!
//! # Pure Functions
//!
//! Nothing here takes note text. There is no way to feed PHI into the digest.

use sha2::{Digest, Sha256};

/// Field delimiter in the canonical string
pub const FIELD_DELIMITER: char = '|';

/// Length of a hex-encoded SHA-256 digest
pub const HASH_HEX_LEN: usize = 64;

/// Build the canonical string hashed by [`integrity_hash`]
///
/// # Examples
///
/// ```
/// use raflift_common::integrity::canonical_fields;
///
/// assert_eq!(canonical_fields("chart-1", "HCC85", 0.455), "chart-1|HCC85|0.455");
/// ```
pub fn canonical_fields(chart_id: &str, hcc_code: &str, coefficient: f64) -> String {
    format!(
        "{}{}{}{}{}",
        chart_id, FIELD_DELIMITER, hcc_code, FIELD_DELIMITER, coefficient
    )
}

/// SHA-256 over the canonical structured fields, as 64 lowercase hex chars
///
/// # Examples
///
/// ```
/// use raflift_common::integrity::integrity_hash;
///
/// let a = integrity_hash("chart-1", "HCC85", 0.455);
/// let b = integrity_hash("chart-1", "HCC85", 0.455);
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn integrity_hash(chart_id: &str, hcc_code: &str, coefficient: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_fields(chart_id, hcc_code, coefficient).as_bytes());
    let result = hasher.finalize();

    format!("{:x}", result)
}

/// Recompute the hash and compare it with a stored one
pub fn verify(chart_id: &str, hcc_code: &str, coefficient: f64, stored_hash: &str) -> bool {
    integrity_hash(chart_id, hcc_code, coefficient) == stored_hash
}

/// True if `hash` has the shape of an integrity hash (64 lowercase hex chars)
pub fn is_well_formed(hash: &str) -> bool {
    hash.len() == HASH_HEX_LEN
        && hash
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}
