//! Document Verification Integration Tests
//!
//! Runs the verifier over the bundled document and over a deliberately
//! damaged copy, and checks the JSON report written for publication review.

use std::path::PathBuf;

use sources_service::verify::*;

fn bundled_body() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("documents/data/sources.json");
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_bundled_document_is_clean() {
    let report = verify_document(&bundled_body()).unwrap();

    for record in &report.records {
        assert_eq!(
            record.status,
            VerificationStatus::Ok,
            "{} has problems: {:?}",
            record.key,
            record.problems
        );
    }
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.ok, 3);
}

#[test]
fn test_damaged_document_is_reported_record_by_record() {
    let mut document: serde_json::Value = serde_json::from_str(&bundled_body()).unwrap();
    let sources = &mut document["sources"];
    sources["boulou_tursac"]["id"] = "boulou".into();
    sources["fontaine_saint_jean"]
        .as_object_mut()
        .unwrap()
        .remove("coordonnees");
    sources["source_des_moines"]["derniere_analyse"]["statut"] = "peut-être".into();

    let report = verify_document(&document.to_string()).unwrap();
    assert_eq!(report.summary, VerificationSummary { total: 3, ok: 0, warnings: 2, failed: 1 });

    let by_key = |key: &str| report.records.iter().find(|r| r.key == key).unwrap();
    assert_eq!(by_key("boulou_tursac").problems, vec![Problem::IdMismatch { id: "boulou".into() }]);
    assert_eq!(by_key("fontaine_saint_jean").status, VerificationStatus::Failed);
    assert_eq!(
        by_key("source_des_moines").problems,
        vec![Problem::UnrecognizedStatus { value: "peut-être".into() }]
    );
}

#[test]
fn test_report_is_written_as_json() {
    let report = verify_document(&bundled_body()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("verification.json");

    write_report(&report, &path).unwrap();

    let written: VerificationReport =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.summary, report.summary);
    assert_eq!(written.records.len(), 3);
    print_summary(&written);
}
