//! Sources Document Verification
//!
//! Checks a sources document record by record before it is published, and
//! reports what the loader would silently tolerate: records without a
//! usable position, missing or misspelled statuses, dates nobody can read.
//!
//! Nothing here changes how a document loads. Out-of-range coordinates, for
//! instance, are reported but still handed to the map as written.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ingest::document::{self, SourcesDocument};
use crate::model::AnalysisStatus;
use crate::render::markup::{self, INVALID_DATE};

// ============================================================================
// Verification Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: String,
    pub records: Vec<RecordVerification>,
    pub summary: VerificationSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSummary {
    pub total: usize,
    pub ok: usize,
    pub warnings: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordVerification {
    pub key: String,
    pub name: Option<String>,
    pub status: VerificationStatus,
    pub problems: Vec<Problem>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Nothing to report.
    Ok,
    /// Loads and renders, but something is off.
    Warnings,
    /// Skipped by the loader, or cannot be placed on the map.
    Failed,
}

/// One thing wrong with a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Problem {
    /// The entry is not a readable record at all.
    Unreadable { message: String },
    MissingCoordinates,
    /// Coordinates are present but not numeric.
    InvalidCoordinates,
    /// Numeric, but outside WGS84 bounds.
    CoordinatesOutOfRange { lat: f64, lng: f64 },
    MissingStatus,
    UnrecognizedStatus { value: String },
    /// The record's own `id` disagrees with its key.
    IdMismatch { id: String },
    UnparseableDate { date: String },
}

impl Problem {
    /// Problems that stop a record from appearing on the map.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Problem::Unreadable { .. } | Problem::MissingCoordinates | Problem::InvalidCoordinates
        )
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Unreadable { message } => write!(f, "unreadable record: {}", message),
            Problem::MissingCoordinates => write!(f, "no coordinates"),
            Problem::InvalidCoordinates => write!(f, "non-numeric coordinates"),
            Problem::CoordinatesOutOfRange { lat, lng } => {
                write!(f, "coordinates out of range ({}, {})", lat, lng)
            }
            Problem::MissingStatus => write!(f, "no analysis status"),
            Problem::UnrecognizedStatus { value } => write!(f, "unrecognized status '{}'", value),
            Problem::IdMismatch { id } => write!(f, "id '{}' differs from its key", id),
            Problem::UnparseableDate { date } => write!(f, "unparseable date '{}'", date),
        }
    }
}

// ============================================================================
// Record Verification
// ============================================================================

const COORDINATE_KEYS: &[&str] = &["coordonnees", "coordinates"];
const LAST_ANALYSIS_KEYS: &[&str] = &["derniere_analyse", "lastAnalysis", "last_analysis"];
const HISTORY_KEYS: &[&str] = &["historique_analyses", "analysisHistory", "analysis_history"];
const STATUS_KEYS: &[&str] = &["statut", "status"];
const NAME_KEYS: &[&str] = &["nom", "name"];

fn field<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| value.get(*k)).filter(|v| !v.is_null())
}

pub fn verify_record(key: &str, value: &Value) -> RecordVerification {
    let mut result = RecordVerification {
        key: key.to_string(),
        name: field(value, NAME_KEYS).and_then(Value::as_str).map(str::to_string),
        status: VerificationStatus::Failed,
        problems: Vec::new(),
    };

    // Test 1: the loader must be able to read it
    if let Err(message) = document::parse_record(key, value.clone()) {
        result.problems.push(Problem::Unreadable { message });
        return result;
    }

    // Test 2: position
    match field(value, COORDINATE_KEYS) {
        None => result.problems.push(Problem::MissingCoordinates),
        Some(raw) => match document::coordinates(raw) {
            None => result.problems.push(Problem::InvalidCoordinates),
            Some(c) if !(-90.0..=90.0).contains(&c.lat) || !(-180.0..=180.0).contains(&c.lng) => {
                result.problems.push(Problem::CoordinatesOutOfRange { lat: c.lat, lng: c.lng });
            }
            Some(_) => {}
        },
    }

    // Test 3: identifier
    if let Some(id) = value.get("id").and_then(Value::as_str) {
        if id != key {
            result.problems.push(Problem::IdMismatch { id: id.to_string() });
        }
    }

    // Test 4: latest analysis status
    let last = field(value, LAST_ANALYSIS_KEYS);
    match last.and_then(|a| field(a, STATUS_KEYS)).and_then(Value::as_str) {
        None => result.problems.push(Problem::MissingStatus),
        Some(s) if !AnalysisStatus::is_recognized(s) => {
            result.problems.push(Problem::UnrecognizedStatus { value: s.to_string() });
        }
        Some(_) => {}
    }

    // Test 5: every analysis date
    let history = field(value, HISTORY_KEYS)
        .and_then(Value::as_array)
        .map(|a| a.as_slice())
        .unwrap_or_default();
    for analysis in last.into_iter().chain(history) {
        if let Some(date) = analysis.get("date").and_then(Value::as_str) {
            if markup::format_date(Some(date)) == INVALID_DATE {
                result.problems.push(Problem::UnparseableDate { date: date.to_string() });
            }
        }
    }

    result.status = if result.problems.iter().any(Problem::is_fatal) {
        VerificationStatus::Failed
    } else if result.problems.is_empty() {
        VerificationStatus::Ok
    } else {
        VerificationStatus::Warnings
    };
    result
}

// ============================================================================
// Full Verification Runner
// ============================================================================

/// Verifies every record of a document body.
///
/// Fails only when the body itself is not a sources document.
pub fn verify_document(body: &str) -> Result<VerificationReport, Box<dyn Error>> {
    let document: SourcesDocument = serde_json::from_str(body)?;
    let entries: BTreeMap<String, Value> = document.sources.unwrap_or_default();

    let mut report = VerificationReport {
        timestamp: Utc::now().to_rfc3339(),
        records: Vec::with_capacity(entries.len()),
        summary: VerificationSummary { total: entries.len(), ..Default::default() },
    };

    for (key, value) in &entries {
        let result = verify_record(key, value);
        match result.status {
            VerificationStatus::Ok => report.summary.ok += 1,
            VerificationStatus::Warnings => report.summary.warnings += 1,
            VerificationStatus::Failed => report.summary.failed += 1,
        }
        report.records.push(result);
    }

    Ok(report)
}

pub fn write_report(report: &VerificationReport, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn print_summary(report: &VerificationReport) {
    println!("═══════════════════════════════════════════════════════════");
    println!("📊 DOCUMENT VERIFICATION");
    println!("═══════════════════════════════════════════════════════════");

    for record in &report.records {
        let label = record.name.as_deref().unwrap_or("(unnamed)");
        match record.status {
            VerificationStatus::Ok => println!("  ✓ {} ({})", record.key, label),
            VerificationStatus::Warnings => println!("  ⚠ {} ({})", record.key, label),
            VerificationStatus::Failed => println!("  ✗ {} ({})", record.key, label),
        }
        for problem in &record.problems {
            println!("      - {}", problem);
        }
    }

    println!();
    println!("Records:   {} total", report.summary.total);
    println!("OK:        {}", report.summary.ok);
    println!("Warnings:  {}", report.summary.warnings);
    println!("Failed:    {}", report.summary.failed);

    let usable = report.summary.ok + report.summary.warnings;
    let rate = if report.summary.total > 0 {
        (usable as f64 / report.summary.total as f64) * 100.0
    } else {
        0.0
    };
    println!();
    println!("Usable on the map: {:.1}% ({}/{})", rate, usable, report.summary.total);
    println!("═══════════════════════════════════════════════════════════");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good() -> Value {
        json!({
            "id": "boulou",
            "nom": "Source du Boulou",
            "coordonnees": {"lat": 44.97, "lng": 1.04},
            "derniere_analyse": {"date": "2024-06-10", "statut": "conforme"},
            "historique_analyses": [{"date": "2023-06-01", "statut": "conforme"}]
        })
    }

    #[test]
    fn test_clean_record_is_ok() {
        let result = verify_record("boulou", &good());
        assert_eq!(result.status, VerificationStatus::Ok, "{:?}", result.problems);
        assert_eq!(result.name.as_deref(), Some("Source du Boulou"));
    }

    #[test]
    fn test_missing_coordinates_fail() {
        let mut value = good();
        value.as_object_mut().unwrap().remove("coordonnees");
        let result = verify_record("boulou", &value);
        assert_eq!(result.status, VerificationStatus::Failed);
        assert_eq!(result.problems, vec![Problem::MissingCoordinates]);
    }

    #[test]
    fn test_non_numeric_coordinates_fail() {
        let mut value = good();
        value["coordonnees"] = json!({"lat": "north", "lng": 1.0});
        assert_eq!(verify_record("boulou", &value).problems, vec![Problem::InvalidCoordinates]);
    }

    #[test]
    fn test_out_of_range_coordinates_only_warn() {
        let mut value = good();
        value["coordonnees"] = json!([144.9, 1.0]);
        let result = verify_record("boulou", &value);
        assert_eq!(result.status, VerificationStatus::Warnings);
        assert_eq!(result.problems, vec![Problem::CoordinatesOutOfRange { lat: 144.9, lng: 1.0 }]);
    }

    #[test]
    fn test_status_problems() {
        let mut value = good();
        value["derniere_analyse"]["statut"] = json!("douteux");
        assert_eq!(
            verify_record("boulou", &value).problems,
            vec![Problem::UnrecognizedStatus { value: "douteux".into() }]
        );

        value.as_object_mut().unwrap().remove("derniere_analyse");
        assert_eq!(verify_record("boulou", &value).problems, vec![Problem::MissingStatus]);
    }

    #[test]
    fn test_pending_spelling_is_recognized() {
        let mut value = good();
        value["derniere_analyse"]["statut"] = json!("en attente");
        assert_eq!(verify_record("boulou", &value).status, VerificationStatus::Ok);
    }

    #[test]
    fn test_id_mismatch_and_bad_history_date_warn() {
        let mut value = good();
        value["id"] = json!("other");
        value["historique_analyses"][0]["date"] = json!("last spring");
        let result = verify_record("boulou", &value);
        assert_eq!(result.status, VerificationStatus::Warnings);
        assert!(result.problems.contains(&Problem::IdMismatch { id: "other".into() }));
        assert!(result.problems.contains(&Problem::UnparseableDate { date: "last spring".into() }));
    }

    #[test]
    fn test_non_object_entry_is_unreadable() {
        let result = verify_record("broken", &json!(42));
        assert_eq!(result.status, VerificationStatus::Failed);
        assert!(matches!(result.problems[0], Problem::Unreadable { .. }));
    }

    #[test]
    fn test_document_summary_counts() {
        let body = json!({
            "sources": {
                "boulou": good(),
                "nowhere": {"nom": "Nowhere", "derniere_analyse": {"statut": "conforme"}},
                "odd": {"coordonnees": [45.0, 1.0], "derniere_analyse": {"statut": "??"}}
            }
        })
        .to_string();

        let report = verify_document(&body).unwrap();
        assert_eq!(
            report.summary,
            VerificationSummary { total: 3, ok: 1, warnings: 1, failed: 1 }
        );
        assert_eq!(report.records[0].key, "boulou");
    }

    #[test]
    fn test_document_that_is_not_json_is_an_error() {
        assert!(verify_document("<html>").is_err());
    }

    #[test]
    fn test_report_serializes_problem_kinds() {
        let report = verify_document(r#"{"sources": {"x": {}}}"#).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["records"][0]["status"], "failed");
        assert_eq!(json["records"][0]["problems"][0]["kind"], "missing_coordinates");
    }
}
