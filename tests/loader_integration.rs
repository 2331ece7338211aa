/// Integration tests for loading the sources document
///
/// Tests verify:
/// 1. The bundled document loads from disk with every record intact
/// 2. Any failure (missing file, unreachable host, bad body) falls back to
///    the single demonstration record
/// 3. The live site serves a document the loader accepts
///
/// The live test is ignored by default; run it with:
///   cargo test --test loader_integration -- --ignored

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use sources_service::ingest::{self, DataOrigin, FileDocumentSource, HttpDocumentSource};
use sources_service::model::{AnalysisStatus, SourcesError, DEMO_SOURCE_ID};
use sources_service::store::SourceStore;

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn bundled_document() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("documents/data/sources.json")
}

fn temp_document(body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(body.as_bytes()).unwrap();
    file
}

// ---------------------------------------------------------------------------
// 1. File loading
// ---------------------------------------------------------------------------

#[test]
fn test_bundled_document_loads() {
    let outcome = ingest::load(&FileDocumentSource::new(bundled_document()));

    assert_eq!(outcome.origin, DataOrigin::Document);
    assert!(outcome.warning.is_none());
    assert_eq!(outcome.skipped, 0);

    let store = SourceStore::new(outcome.records);
    assert_eq!(store.ids(), vec!["boulou_tursac", "fontaine_saint_jean", "source_des_moines"]);

    let summary = store.summary();
    assert_eq!(summary.total, 3);
    assert_eq!(summary.compliant, 1);
}

#[test]
fn test_bundled_document_records_are_typed() {
    let outcome = ingest::load(&FileDocumentSource::new(bundled_document()));
    let store = SourceStore::new(outcome.records);

    let boulou = store.get("boulou_tursac").unwrap();
    assert_eq!(boulou.status(), AnalysisStatus::Compliant);
    assert_eq!(boulou.analysis_history.len(), 2);
    assert_eq!(boulou.analysis_history[1].parameters.bacteria, Some(4.0));

    let fontaine = store.get("fontaine_saint_jean").unwrap();
    assert_eq!(fontaine.id, "fontaine_saint_jean", "id taken from the key");
    assert_eq!(fontaine.last_analysis.issues.len(), 2);

    let moines = store.get("source_des_moines").unwrap();
    assert_eq!(moines.status(), AnalysisStatus::Pending);
    assert_eq!(moines.coordinates.map(|c| c.lat), Some(45.0524));
}

#[test]
fn test_empty_sources_is_an_empty_store_not_a_fallback() {
    let file = temp_document(r#"{"sources": {}}"#);
    let outcome = ingest::load(&FileDocumentSource::new(file.path()));

    assert_eq!(outcome.origin, DataOrigin::Document);
    assert!(outcome.records.is_empty());
}

#[test]
fn test_unreadable_record_is_skipped_and_the_rest_load() {
    let file = temp_document(
        r#"{"sources": {
            "good": {"nom": "Good", "coordonnees": {"lat": 45.0, "lng": 1.0}},
            "bad": "not a record"
        }}"#,
    );
    let outcome = ingest::load(&FileDocumentSource::new(file.path()));

    assert_eq!(outcome.origin, DataOrigin::Document);
    assert_eq!(outcome.skipped, 1);
    assert!(outcome.records.contains_key("good"));
}

// ---------------------------------------------------------------------------
// 2. Fallback
// ---------------------------------------------------------------------------

#[test]
fn test_missing_file_falls_back_to_demo() {
    let outcome = ingest::load(&FileDocumentSource::new("/nonexistent/sources.json"));

    assert_eq!(outcome.origin, DataOrigin::Fallback);
    assert_eq!(outcome.records.keys().collect::<Vec<_>>(), vec![DEMO_SOURCE_ID]);
    assert!(matches!(outcome.warning, Some(SourcesError::DataUnavailable(_))));
}

#[test]
fn test_malformed_body_falls_back_to_demo() {
    let file = temp_document("<!doctype html><p>Not found</p>");
    let outcome = ingest::load(&FileDocumentSource::new(file.path()));

    assert_eq!(outcome.origin, DataOrigin::Fallback);
    assert_eq!(outcome.records.len(), 1);
}

#[test]
fn test_unreachable_host_falls_back_to_demo() {
    // Nothing listens on the discard port locally; the connection is refused.
    let source = HttpDocumentSource::new(
        "http://127.0.0.1:9/",
        "documents/data/sources.json",
        Duration::from_secs(2),
    )
    .unwrap();
    let outcome = ingest::load(&source);

    assert_eq!(outcome.origin, DataOrigin::Fallback);
    assert!(outcome.records.contains_key(DEMO_SOURCE_ID));
}

// ---------------------------------------------------------------------------
// 3. Live site
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn test_live_document_loads() {
    let source = HttpDocumentSource::new(
        "https://sources-vivantes.fr",
        "documents/data/sources.json",
        Duration::from_secs(30),
    )
    .unwrap();
    let outcome = ingest::load(&source);

    assert_eq!(
        outcome.origin,
        DataOrigin::Document,
        "live document should load: {:?}",
        outcome.warning
    );
    println!("Loaded {} sources ({} skipped)", outcome.records.len(), outcome.skipped);
}
