/// In-memory source store and the embedded demonstration record.
///
/// The store is the single lookup point for records by identifier. It is
/// filled once per load and read-only afterwards; a reload replaces it
/// wholesale. The summary counters shown in the page header are derived
/// from it on demand, never maintained alongside it.

use std::collections::BTreeMap;

use crate::model::{
    AccessInfo, AnalysisResult, AnalysisStatus, Coordinates, Parameters, SourceRecord,
    SourcesError, DEMO_SOURCE_ID,
};

// ---------------------------------------------------------------------------
// Embedded fallback
// ---------------------------------------------------------------------------

/// The demonstration record served when the sources document is unavailable.
pub fn demo_record() -> SourceRecord {
    SourceRecord {
        id: DEMO_SOURCE_ID.to_string(),
        name: Some("Source de Démonstration".to_string()),
        municipality: Some("Exemple-sur-Loire".to_string()),
        department: Some("Dordogne".to_string()),
        coordinates: Some(Coordinates { lat: 44.9759, lng: 1.0344 }),
        last_analysis: AnalysisResult {
            date: Some("2025-06-15".to_string()),
            laboratory: Some("Eurofins Environnement".to_string()),
            status: AnalysisStatus::Compliant,
            parameters: Parameters {
                nitrates: Some(8.2),
                nitrates_limit: Some(50.0),
                bacteria: Some(0.0),
                bacteria_limit: Some(0.0),
                ph: Some(7.4),
                ph_min: Some(6.5),
                ph_max: Some(9.0),
                conductivity: Some(420.0),
            },
            issues: Vec::new(),
        },
        analysis_history: vec![AnalysisResult {
            date: Some("2024-06-10".to_string()),
            status: AnalysisStatus::Compliant,
            parameters: Parameters {
                nitrates: Some(7.8),
                bacteria: Some(0.0),
                ..Default::default()
            },
            ..Default::default()
        }],
        access: AccessInfo {
            attendance: Some("forte".to_string()),
            access: Some("Parking à 100m, sentier balisé facile (5 min de marche)".to_string()),
            flow: Some("Constant toute l'année".to_string()),
        },
        description: Some(
            "Source naturelle très appréciée des randonneurs. Eau claire et fraîche.".to_string(),
        ),
        photos: vec!["demo-source-1.webp".to_string(), "demo-source-2.webp".to_string()],
        recommendations: Vec::new(),
        press_mentions: Vec::new(),
        heritage_notes: Vec::new(),
    }
}

/// Single-entry mapping holding the demonstration record.
pub fn fallback_records() -> BTreeMap<String, SourceRecord> {
    let demo = demo_record();
    BTreeMap::from([(demo.id.clone(), demo)])
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Header counters: how many sources, how many currently compliant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct SourceSummary {
    pub total: usize,
    pub compliant: usize,
}

/// Records keyed by identifier. Every key equals its record's `id`.
#[derive(Debug, Clone, Default)]
pub struct SourceStore {
    records: BTreeMap<String, SourceRecord>,
}

impl SourceStore {
    /// Builds a store, re-keying any entry whose key disagrees with its id.
    pub fn new(records: BTreeMap<String, SourceRecord>) -> Self {
        let records = records
            .into_values()
            .map(|record| (record.id.clone(), record))
            .collect();
        SourceStore { records }
    }

    /// Looks up a record. Unknown identifiers are `RecordNotFound`.
    pub fn get(&self, id: &str) -> Result<&SourceRecord, SourcesError> {
        self.records
            .get(id)
            .ok_or_else(|| SourcesError::RecordNotFound(id.to_string()))
    }

    /// Records in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &SourceRecord> {
        self.records.values()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Recomputes the header counters from the current records.
    pub fn summary(&self) -> SourceSummary {
        SourceSummary {
            total: self.records.len(),
            compliant: self
                .records
                .values()
                .filter(|r| r.status() == AnalysisStatus::Compliant)
                .count(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
