/// Sources document parsing
///
/// Turns the site's `sources.json` into typed `SourceRecord`s. This is the
/// only place that looks at raw JSON: every optional field is checked here,
/// once, so renderers never deal with missing keys or odd value types.
///
/// The document uses the site's French keys (`nom`, `commune`,
/// `derniere_analyse`, ...). English spellings are accepted as aliases.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::logging::{self, Component};
use crate::model::{
    AccessInfo, AnalysisResult, AnalysisStatus, Coordinates, Parameters, PressMention,
    SourceRecord, SourcesError,
};

// ============================================================================
// Wire Structures
// ============================================================================

/// Top-level document. `sources` maps identifier → record.
#[derive(Debug, Deserialize)]
pub struct SourcesDocument {
    #[serde(default)]
    pub sources: Option<BTreeMap<String, Value>>,
}

// Document keys for each field, French spelling first. Either spelling is
// read, and when a record carries both the first one present wins.
const ID: &[&str] = &["id"];
const NAME: &[&str] = &["nom", "name"];
const MUNICIPALITY: &[&str] = &["commune", "municipality"];
const DEPARTMENT: &[&str] = &["departement", "department"];
const COORDINATES: &[&str] = &["coordonnees", "coordinates"];
const LAST_ANALYSIS: &[&str] = &["derniere_analyse", "lastAnalysis", "last_analysis"];
const HISTORY: &[&str] = &["historique_analyses", "analysisHistory", "analysis_history"];
const ATTENDANCE: &[&str] = &["frequentation", "attendance"];
const ACCESS: &[&str] = &["acces", "access"];
const FLOW: &[&str] = &["debit", "flow"];
const DESCRIPTION: &[&str] = &["description"];
const PHOTOS: &[&str] = &["photos"];
const RECOMMENDATIONS: &[&str] = &["recommandations", "recommendations"];
const PRESS: &[&str] = &["mentions_presse", "press", "media"];
const HERITAGE: &[&str] = &["patrimoine", "heritage"];

const DATE: &[&str] = &["date"];
const LABORATORY: &[&str] = &["laboratoire", "laboratory"];
const STATUS: &[&str] = &["statut", "status"];
const PARAMETERS: &[&str] = &["parametres", "parameters"];
const ISSUES: &[&str] = &["problemes", "issues"];
const FLAT_NITRATES: &[&str] = &["nitrates"];
const FLAT_BACTERIA: &[&str] = &["bacteries", "bacteria"];

const MENTION_TITLE: &[&str] = &["title", "titre"];
const MENTION_OUTLET: &[&str] = &["outlet", "media", "journal", "source"];
const MENTION_URL: &[&str] = &["url", "lien"];

/// One JSON object as written in the document (a record, an analysis or a
/// press mention). Every field is optional and read leniently: a value of
/// the wrong type degrades to "absent" instead of rejecting the record.
#[derive(Debug, Clone, Copy)]
struct RawObject<'a>(&'a Map<String, Value>);

impl<'a> RawObject<'a> {
    fn of(value: &'a Value) -> Option<Self> {
        value.as_object().map(RawObject)
    }

    /// First non-null value stored under any of `keys`.
    fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|k| self.0.get(*k))
            .find(|v| !v.is_null())
    }

    fn text(&self, keys: &[&str]) -> Option<String> {
        self.get(keys).and_then(text)
    }

    fn texts(&self, keys: &[&str]) -> Vec<String> {
        self.get(keys).map(texts).unwrap_or_default()
    }

    fn number(&self, keys: &[&str]) -> Option<f64> {
        self.get(keys).and_then(number)
    }

    /// Items of a list field. A lone value counts as a one-item list.
    fn items(&self, keys: &[&str]) -> Vec<&'a Value> {
        match self.get(keys) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(other) => vec![other],
            None => Vec::new(),
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Result of parsing a document: the records plus the count of entries that
/// had to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub records: BTreeMap<String, SourceRecord>,
    pub total_entries: usize,
    pub skipped: usize,
}

/// Parses a sources document body.
///
/// Fails only when the body is not a JSON object of the expected outer
/// shape. A document without `sources` yields an empty mapping. Individual
/// records that cannot be read are skipped with a warning.
pub fn parse_document(body: &str) -> Result<ParsedDocument, SourcesError> {
    let document: SourcesDocument = serde_json::from_str(body)
        .map_err(|e| SourcesError::DataUnavailable(format!("Parse error: {}", e)))?;

    let entries = document.sources.unwrap_or_default();
    let total_entries = entries.len();
    let mut records = BTreeMap::new();
    let mut skipped = 0;

    for (key, value) in entries {
        match parse_record(&key, value) {
            Ok(record) => {
                records.insert(key, record);
            }
            Err(msg) => {
                logging::warn(Component::Loader, Some(&key), &format!("record skipped: {}", msg));
                skipped += 1;
            }
        }
    }

    Ok(ParsedDocument { records, total_entries, skipped })
}

/// Builds one typed record from its document entry.
///
/// The key always wins over the record's own `id`, so the mapping stays
/// keyed by id. Only an entry that is not a JSON object is unreadable.
pub fn parse_record(key: &str, value: Value) -> Result<SourceRecord, String> {
    let raw = RawObject::of(&value)
        .ok_or_else(|| format!("expected an object, found {}", kind_of(&value)))?;

    if let Some(id) = raw.text(ID) {
        if id != key {
            logging::warn(
                Component::Loader,
                Some(key),
                &format!("record id '{}' differs from its key; using the key", id),
            );
        }
    }

    Ok(SourceRecord {
        id: key.to_string(),
        name: raw.text(NAME),
        municipality: raw.text(MUNICIPALITY),
        department: raw.text(DEPARTMENT),
        coordinates: raw.get(COORDINATES).and_then(coordinates),
        last_analysis: raw
            .get(LAST_ANALYSIS)
            .and_then(RawObject::of)
            .map(analysis)
            .unwrap_or_default(),
        analysis_history: raw
            .items(HISTORY)
            .into_iter()
            .filter_map(RawObject::of)
            .map(analysis)
            .collect(),
        access: AccessInfo {
            attendance: raw.text(ATTENDANCE),
            access: raw.text(ACCESS),
            flow: raw.text(FLOW),
        },
        description: raw.text(DESCRIPTION),
        photos: raw.texts(PHOTOS),
        recommendations: raw.texts(RECOMMENDATIONS),
        press_mentions: raw.items(PRESS).into_iter().filter_map(mention).collect(),
        heritage_notes: raw.texts(HERITAGE),
    })
}

/// A sampling event. History entries carry `nitrates` / `bacteries` flat on
/// the entry instead of inside `parametres`; both shapes are read.
fn analysis(raw: RawObject<'_>) -> AnalysisResult {
    let params = raw.get(PARAMETERS).and_then(RawObject::of);
    let param = |keys: &[&str]| params.and_then(|p| p.number(keys));

    let parameters = Parameters {
        nitrates: param(&["nitrates"]).or_else(|| raw.number(FLAT_NITRATES)),
        nitrates_limit: param(&["nitrates_limite", "nitrates_limit"]),
        bacteria: param(&["bacteries", "bacteria"]).or_else(|| raw.number(FLAT_BACTERIA)),
        bacteria_limit: param(&["bacteries_limite", "bacteria_limit"]),
        ph: param(&["ph", "pH"]),
        ph_min: param(&["ph_min"]),
        ph_max: param(&["ph_max"]),
        conductivity: param(&["conductivite", "conductivity"]),
    };

    AnalysisResult {
        date: raw.get(DATE).and_then(date_text),
        laboratory: raw.text(LABORATORY),
        status: AnalysisStatus::from_wire(raw.text(STATUS).as_deref()),
        parameters,
        issues: raw.texts(ISSUES),
    }
}

/// A press mention is either a bare title or an object with a title.
fn mention(value: &Value) -> Option<PressMention> {
    match RawObject::of(value) {
        Some(raw) => raw.text(MENTION_TITLE).map(|title| PressMention {
            title,
            outlet: raw.text(MENTION_OUTLET),
            date: raw.get(DATE).and_then(date_text),
            url: raw.text(MENTION_URL),
        }),
        None => text(value).map(|title| PressMention {
            title,
            outlet: None,
            date: None,
            url: None,
        }),
    }
}

// ============================================================================
// Value Helpers
// ============================================================================

/// Reads a finite number from a JSON number or numeric string.
pub fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Reads a position from `{lat, lng}` (or `latitude`/`longitude`) or a
/// two-element `[lat, lng]` array. Anything non-numeric yields `None`.
pub fn coordinates(value: &Value) -> Option<Coordinates> {
    match value {
        Value::Object(map) => {
            let lat = ["lat", "latitude"].iter().find_map(|k| map.get(*k).and_then(number))?;
            let lng = ["lng", "lon", "longitude"].iter().find_map(|k| map.get(*k).and_then(number))?;
            Some(Coordinates { lat, lng })
        }
        Value::Array(items) if items.len() == 2 => Some(Coordinates {
            lat: number(&items[0])?,
            lng: number(&items[1])?,
        }),
        _ => None,
    }
}

/// Reads display text from a string, number or boolean. Blank strings and
/// structured values yield `None`.
pub fn text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// A date is kept whatever its JSON type so that a malformed one still
/// renders as "invalid date" rather than "not specified".
fn date_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(_) => text(value),
        other => Some(other.to_string()),
    }
}

/// Reads a text list from either a single text or an array of texts.
fn texts(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(text).collect(),
        other => text(other).into_iter().collect(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SAINT_MARTIAL: &str = r#"{
        "sources": {
            "fontaine_saint_martial": {
                "id": "fontaine_saint_martial",
                "nom": "Fontaine Saint-Martial",
                "commune": "Saint-Martial-de-Nabirat",
                "departement": "Dordogne",
                "coordonnees": { "lat": 44.8234, "lng": 1.2156 },
                "derniere_analyse": {
                    "date": "2025-07-02",
                    "statut": "non-conforme",
                    "laboratoire": "Eurofins Environnement",
                    "parametres": {
                        "nitrates": 62.0, "nitrates_limite": 50,
                        "bacteries": 15, "bacteries_limite": 0,
                        "ph": 6.8, "ph_min": 6.5, "ph_max": 9.0,
                        "conductivite": 580, "turbidite": 2.1
                    },
                    "problemes": [
                        "Nitrates au-dessus de la limite (62 mg/L > 50 mg/L)",
                        "Présence de bactéries coliformes (15 CFU/100mL)"
                    ]
                },
                "frequentation": "modérée",
                "acces": "Sentier de randonnée, 15 min de marche depuis le village",
                "debit": "Variable selon saison",
                "description": "Source traditionnelle nécessitant une surveillance renforcée.",
                "photos": ["saint-martial-1.webp"],
                "historique_analyses": [
                    { "date": "2024-07-05", "statut": "conforme", "nitrates": 45.2, "bacteries": 0 }
                ],
                "recommandations": [
                    "Éviter la consommation directe",
                    "Faire bouillir l'eau avant usage"
                ]
            }
        }
    }"#;

    #[test]
    fn test_parse_full_record() {
        let parsed = parse_document(SAINT_MARTIAL).expect("document should parse");
        assert_eq!(parsed.total_entries, 1);
        assert_eq!(parsed.skipped, 0);

        let record = &parsed.records["fontaine_saint_martial"];
        assert_eq!(record.name.as_deref(), Some("Fontaine Saint-Martial"));
        assert_eq!(record.coordinates, Some(Coordinates { lat: 44.8234, lng: 1.2156 }));
        assert_eq!(record.status(), AnalysisStatus::NonCompliant);
        assert_eq!(record.last_analysis.parameters.nitrates, Some(62.0));
        assert_eq!(record.last_analysis.parameters.nitrates_limit, Some(50.0));
        assert_eq!(record.last_analysis.parameters.conductivity, Some(580.0));
        assert_eq!(record.last_analysis.issues.len(), 2);
        assert_eq!(record.recommendations.len(), 2);
        assert_eq!(record.access.flow.as_deref(), Some("Variable selon saison"));
    }

    #[test]
    fn test_history_entries_read_flat_values() {
        let parsed = parse_document(SAINT_MARTIAL).unwrap();
        let history = &parsed.records["fontaine_saint_martial"].analysis_history;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].parameters.nitrates, Some(45.2));
        assert_eq!(history[0].parameters.bacteria, Some(0.0));
        assert_eq!(history[0].status, AnalysisStatus::Compliant);
    }

    #[test]
    fn test_document_without_sources_is_empty() {
        let parsed = parse_document(r#"{"version": 2}"#).expect("object without sources is valid");
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn test_malformed_body_is_data_unavailable() {
        match parse_document("<html>not json</html>") {
            Err(SourcesError::DataUnavailable(msg)) => assert!(msg.starts_with("Parse error")),
            other => panic!("expected DataUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_record_is_skipped_others_kept() {
        let body = json!({
            "sources": {
                "broken": "not an object",
                "ok": { "nom": "Source du Boulou", "coordonnees": { "lat": 44.97, "lng": 1.03 } }
            }
        })
        .to_string();
        let parsed = parse_document(&body).unwrap();
        assert_eq!(parsed.skipped, 1);
        assert!(parsed.records.contains_key("ok"));
        assert!(!parsed.records.contains_key("broken"));
    }

    #[test]
    fn test_key_wins_over_mismatched_id() {
        let record = parse_record("boulou_tursac", json!({ "id": "boulou" })).unwrap();
        assert_eq!(record.id, "boulou_tursac");
        let record = parse_record("no_id", json!({})).unwrap();
        assert_eq!(record.id, "no_id");
    }

    #[test]
    fn test_missing_analysis_is_pending_and_unknown() {
        let record = parse_record("bare", json!({ "nom": "Bare" })).unwrap();
        assert_eq!(record.status(), AnalysisStatus::Pending);
        assert_eq!(record.last_analysis.date, None);
        assert_eq!(record.last_analysis.parameters, Parameters::default());
    }

    #[test]
    fn test_english_aliases_are_accepted() {
        let record = parse_record(
            "en",
            json!({
                "name": "Spring",
                "municipality": "Tursac",
                "coordinates": { "latitude": 44.9, "longitude": 1.0 },
                "lastAnalysis": { "status": "compliant", "parameters": { "nitrates": 8.2 } },
                "analysisHistory": [
                    { "date": "2024-05-15", "status": "compliant" },
                    { "date": "2025-05-20", "status": "compliant" }
                ]
            }),
        )
        .unwrap();
        assert_eq!(record.display_name(), "Spring");
        assert_eq!(record.coordinates, Some(Coordinates { lat: 44.9, lng: 1.0 }));
        assert_eq!(record.status(), AnalysisStatus::Compliant);
        assert_eq!(record.analysis_history[0].date.as_deref(), Some("2024-05-15"));
        assert_eq!(record.analysis_history[1].date.as_deref(), Some("2025-05-20"));
    }

    #[test]
    fn test_non_numeric_coordinates_become_none() {
        assert_eq!(coordinates(&json!({ "lat": "north", "lng": 1.0 })), None);
        assert_eq!(coordinates(&json!({ "lat": 44.9 })), None);
        assert_eq!(coordinates(&json!(null)), None);
        assert_eq!(
            coordinates(&json!({ "lat": "44.5", "lng": "1.25" })),
            Some(Coordinates { lat: 44.5, lng: 1.25 })
        );
        assert_eq!(coordinates(&json!([44.5, 1.25])), Some(Coordinates { lat: 44.5, lng: 1.25 }));
    }

    #[test]
    fn test_stray_parameter_types_are_absent() {
        let record = parse_record(
            "odd",
            json!({ "derniere_analyse": { "parametres": { "nitrates": "n/a", "ph": null, "bacteries": "3" } } }),
        )
        .unwrap();
        let params = &record.last_analysis.parameters;
        assert_eq!(params.nitrates, None);
        assert_eq!(params.ph, None);
        assert_eq!(params.bacteria, Some(3.0));
    }

    #[test]
    fn test_mistyped_optional_fields_keep_the_record() {
        let record = parse_record(
            "odd_types",
            json!({
                "nom": 42,
                "coordonnees": { "lat": 44.9, "lng": 1.0 },
                "derniere_analyse": { "date": 20250615, "laboratoire": 7, "statut": "conforme" },
                "description": { "fr": "nested" },
                "recommandations": ["Boire", 3, null]
            }),
        )
        .expect("record with odd optional types is still readable");

        assert_eq!(record.name.as_deref(), Some("42"));
        assert_eq!(record.last_analysis.date.as_deref(), Some("20250615"));
        assert_eq!(record.last_analysis.laboratory.as_deref(), Some("7"));
        assert_eq!(record.status(), AnalysisStatus::Compliant);
        assert_eq!(record.description, None);
        assert_eq!(record.recommendations, vec!["Boire".to_string(), "3".to_string()]);
        assert_eq!(
            crate::render::markup::format_date(record.last_analysis.date.as_deref()),
            crate::render::markup::INVALID_DATE
        );
    }

    #[test]
    fn test_both_spellings_present_prefers_french() {
        let record = parse_record(
            "both",
            json!({
                "nom": "Fontaine du Bourg",
                "name": "Town Fountain",
                "coordonnees": { "lat": 44.9, "lng": 1.0 },
                "coordinates": { "lat": 0.0, "lng": 0.0 },
                "derniere_analyse": { "statut": "non-conforme" },
                "lastAnalysis": { "status": "compliant" }
            }),
        )
        .expect("duplicate spellings are not an error");

        assert_eq!(record.display_name(), "Fontaine du Bourg");
        assert_eq!(record.coordinates, Some(Coordinates { lat: 44.9, lng: 1.0 }));
        assert_eq!(record.status(), AnalysisStatus::NonCompliant);
    }

    #[test]
    fn test_empty_narrative_fields_are_dropped() {
        let record = parse_record(
            "sparse",
            json!({
                "description": "   ",
                "recommandations": [],
                "patrimoine": "",
                "photos": [""],
                "mentions_presse": [
                    "Sud Ouest, juin 2024",
                    { "titre": "La source qui ne tarit jamais", "media": "France 3", "lien": "https://example.org/a" }
                ]
            }),
        )
        .unwrap();
        assert_eq!(record.description, None);
        assert!(record.recommendations.is_empty());
        assert!(record.heritage_notes.is_empty());
        assert!(record.photos.is_empty());
        assert_eq!(record.press_mentions.len(), 2);
        assert_eq!(record.press_mentions[1].outlet.as_deref(), Some("France 3"));
    }
}
