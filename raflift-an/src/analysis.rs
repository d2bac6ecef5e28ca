//! Chart note analysis: note text in, structured RAF result out
//!
//! PHI handling:
//! - [`NoteText`] has no `Serialize` or `Display` and redacts itself in `Debug`
//! - [`AnalyzeResult`] can only be built from allow-listed structured fields
//!   (chart id, coefficient entry, audit id), never from a request
//! - Errors name what was wrong, never what was sent

use raflift_common::db::{CoefficientEntry, CoefficientTable};
use raflift_common::integrity_hash;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::matcher::CodeMatcher;

/// Free-text clinical note. Contains PHI.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct NoteText(String);

impl NoteText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for NoteText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NoteText(<redacted, {} bytes>)", self.0.len())
    }
}

/// POST /v28/analyze body
///
/// Both fields are optional at the serde level so that a missing field is
/// reported as a validation failure instead of a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub chart_id: Option<String>,
    #[serde(default)]
    pub note_text: Option<NoteText>,
}

/// Structured analysis result returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeResult {
    chart_id: String,
    hcc_code: String,
    raf_lift: f64,
    audit_uuid: Uuid,
    integrity_hash: String,
}

impl AnalyzeResult {
    /// Build a result from the allow-listed fields, computing the integrity hash
    pub fn new(chart_id: &str, entry: CoefficientEntry, audit_uuid: Uuid) -> Self {
        let integrity_hash = integrity_hash(chart_id, &entry.hcc_code, entry.coefficient);
        Self {
            chart_id: chart_id.to_string(),
            hcc_code: entry.hcc_code,
            raf_lift: entry.coefficient,
            audit_uuid,
            integrity_hash,
        }
    }

    pub fn chart_id(&self) -> &str {
        &self.chart_id
    }

    pub fn hcc_code(&self) -> &str {
        &self.hcc_code
    }

    pub fn raf_lift(&self) -> f64 {
        self.raf_lift
    }

    pub fn audit_uuid(&self) -> Uuid {
        self.audit_uuid
    }

    pub fn integrity_hash(&self) -> &str {
        &self.integrity_hash
    }
}

/// Analysis failures. Messages are fixed strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    #[error("chart_id is required and must not be empty")]
    MissingChartId,

    #[error("note_text is required and must not be empty")]
    MissingNoteText,

    #[error("no recognized HCC code found in note_text")]
    NoRecognizedCode,
}

/// Map a note to its HCC coefficient
///
/// Validates input, finds the first recognized HCC code, and builds the
/// result with a fresh v4 audit id.
pub fn analyze(
    chart_id: &str,
    note_text: &NoteText,
    table: &CoefficientTable,
    matcher: &dyn CodeMatcher,
) -> Result<AnalyzeResult, AnalyzeError> {
    if chart_id.trim().is_empty() {
        return Err(AnalyzeError::MissingChartId);
    }
    if note_text.is_blank() {
        return Err(AnalyzeError::MissingNoteText);
    }

    let entry = matcher
        .find_code(note_text.as_str(), table)
        .ok_or(AnalyzeError::NoRecognizedCode)?;

    Ok(AnalyzeResult::new(chart_id, entry, Uuid::new_v4()))
}

/// Validate a request body and run [`analyze`]
pub fn analyze_request(
    request: &AnalyzeRequest,
    table: &CoefficientTable,
    matcher: &dyn CodeMatcher,
) -> Result<AnalyzeResult, AnalyzeError> {
    let chart_id = request
        .chart_id
        .as_deref()
        .ok_or(AnalyzeError::MissingChartId)?;
    let note_text = request
        .note_text
        .as_ref()
        .ok_or(AnalyzeError::MissingNoteText)?;

    analyze(chart_id, note_text, table, matcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::KeywordMatcher;

    const NOTE: &str = "Jane Doe, DOB 1950-02-03. Chronic CHF, documented HCC85.";

    fn table() -> CoefficientTable {
        CoefficientTable::from_entries(
            [("HCC85", 0.455), ("HCC18", 0.163), ("HCC19", 0.342)]
                .into_iter()
                .map(|(code, coefficient)| CoefficientEntry {
                    hcc_code: code.to_string(),
                    coefficient,
                }),
        )
    }

    fn run(chart_id: &str, note: &str) -> Result<AnalyzeResult, AnalyzeError> {
        analyze(chart_id, &NoteText::new(note), &table(), &KeywordMatcher::new())
    }

    #[test]
    fn test_hcc85_maps_to_0_455() {
        let result = run("chart-001", NOTE).unwrap();
        assert_eq!(result.hcc_code(), "HCC85");
        assert_eq!(result.raf_lift(), 0.455);
        assert_eq!(result.chart_id(), "chart-001");
        assert_eq!(result.integrity_hash().len(), 64);
    }

    #[test]
    fn test_hash_is_deterministic_and_uuid_is_fresh() {
        let a = run("chart-001", NOTE).unwrap();
        let b = run("chart-001", "different words, same code: HCC85").unwrap();

        assert_eq!(a.integrity_hash(), b.integrity_hash());
        assert_ne!(a.audit_uuid(), b.audit_uuid());
        assert_eq!(a.audit_uuid().get_version_num(), 4);
    }

    #[test]
    fn test_hash_ignores_note_text() {
        let result = run("chart-001", NOTE).unwrap();
        assert_eq!(
            result.integrity_hash(),
            integrity_hash("chart-001", "HCC85", 0.455)
        );
    }

    #[test]
    fn test_validation_errors() {
        assert_eq!(run("", NOTE), Err(AnalyzeError::MissingChartId));
        assert_eq!(run("   ", NOTE), Err(AnalyzeError::MissingChartId));
        assert_eq!(run("chart-001", ""), Err(AnalyzeError::MissingNoteText));
        assert_eq!(run("chart-001", " \n\t"), Err(AnalyzeError::MissingNoteText));
    }

    #[test]
    fn test_no_recognized_code() {
        assert_eq!(
            run("chart-001", "Routine visit, nothing coded."),
            Err(AnalyzeError::NoRecognizedCode)
        );
    }

    #[test]
    fn test_missing_request_fields() {
        let request: AnalyzeRequest = serde_json::from_str(r#"{"data": ""}"#).unwrap();
        assert_eq!(
            analyze_request(&request, &table(), &KeywordMatcher::new()),
            Err(AnalyzeError::MissingChartId)
        );

        let request: AnalyzeRequest = serde_json::from_str(r#"{"chart_id": "c1"}"#).unwrap();
        assert_eq!(
            analyze_request(&request, &table(), &KeywordMatcher::new()),
            Err(AnalyzeError::MissingNoteText)
        );
    }

    #[test]
    fn test_debug_redacts_note_text() {
        let request = AnalyzeRequest {
            chart_id: Some("chart-001".to_string()),
            note_text: Some(NoteText::new(NOTE)),
        };

        let rendered = format!("{:?}", request);
        assert!(rendered.contains("chart-001"));
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains("Jane Doe"));
    }

    #[test]
    fn test_result_serializes_allow_listed_fields_only() {
        let result = run("chart-001", NOTE).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            vec!["audit_uuid", "chart_id", "hcc_code", "integrity_hash", "raf_lift"]
        );
    }

    #[test]
    fn test_error_messages_do_not_echo_input() {
        for err in [
            AnalyzeError::MissingChartId,
            AnalyzeError::MissingNoteText,
            AnalyzeError::NoRecognizedCode,
        ] {
            assert!(!err.to_string().contains("Jane"));
        }
    }
}
