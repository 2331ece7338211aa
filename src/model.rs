/// Core data types for the water-source presentation service.
///
/// This module defines the shared domain model imported by all other modules.
/// Records arrive here already typed: every optional field of the sources
/// document has been checked exactly once, in `ingest::document`, so render
/// code only ever matches on `Option`s.
///
/// It contains no I/O and no rendering.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifier of the embedded demonstration record served when the sources
/// document cannot be loaded.
pub const DEMO_SOURCE_ID: &str = "demo";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Overall status of an analysis, as declared by the laboratory.
///
/// Anything the document does not spell out as compliant or non-compliant is
/// `Pending`. Unknown is never compliant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisStatus {
    Compliant,
    NonCompliant,
    #[default]
    Pending,
}

impl AnalysisStatus {
    /// Maps a wire value (French or English spelling) to a status.
    /// Absent and unrecognized values both yield `Pending`.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("conforme") | Some("compliant") => AnalysisStatus::Compliant,
            Some("non-conforme") | Some("non_conforme") | Some("non conforme")
            | Some("non-compliant") | Some("non_compliant") => AnalysisStatus::NonCompliant,
            _ => AnalysisStatus::Pending,
        }
    }

    /// Returns `true` when the wire value is one of the recognized spellings.
    /// Used by document verification to report unrecognized statuses.
    pub fn is_recognized(value: &str) -> bool {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "conforme" | "compliant" | "non-conforme" | "non_conforme" | "non conforme"
                | "non-compliant" | "non_compliant" | "attente" | "en attente" | "pending"
        )
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStatus::Compliant => write!(f, "compliant"),
            AnalysisStatus::NonCompliant => write!(f, "non-compliant"),
            AnalysisStatus::Pending => write!(f, "pending"),
        }
    }
}

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// WGS84 position of a source. Bounds are not validated here; the map
/// provider receives whatever the document says.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Measured values of one sampling event. Every value is optional; a missing
/// value means "not measured", never "failed".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    pub nitrates: Option<f64>,       // mg/L
    pub nitrates_limit: Option<f64>,
    pub bacteria: Option<f64>,       // CFU/100mL
    pub bacteria_limit: Option<f64>,
    pub ph: Option<f64>,
    pub ph_min: Option<f64>,
    pub ph_max: Option<f64>,
    pub conductivity: Option<f64>,   // µS/cm
}

/// One water-quality sampling event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResult {
    /// Raw date string as supplied, e.g. "2025-06-15".
    pub date: Option<String>,
    pub laboratory: Option<String>,
    pub status: AnalysisStatus,
    pub parameters: Parameters,
    /// Problems found by the laboratory. Empty when none were listed.
    pub issues: Vec<String>,
}

/// A press article or broadcast mentioning the source.
#[derive(Debug, Clone, PartialEq)]
pub struct PressMention {
    pub title: String,
    pub outlet: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
}

/// Practical information shown next to the location block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccessInfo {
    pub attendance: Option<String>,
    pub access: Option<String>,
    pub flow: Option<String>,
}

impl AccessInfo {
    pub fn is_empty(&self) -> bool {
        self.attendance.is_none() && self.access.is_none() && self.flow.is_none()
    }
}

/// One monitored water source.
///
/// Built once per load and never mutated afterwards. Optional narrative
/// fields hold `None` / empty vectors when the document leaves them out or
/// gives them empty, so a section is rendered iff its field carries content.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    pub id: String,
    pub name: Option<String>,
    pub municipality: Option<String>,
    pub department: Option<String>,
    /// `None` when the document omits the position or gives non-numeric
    /// values. Such records are kept but cannot be pinned.
    pub coordinates: Option<Coordinates>,
    pub last_analysis: AnalysisResult,
    /// Prior analyses in document order. Never re-sorted.
    pub analysis_history: Vec<AnalysisResult>,
    pub access: AccessInfo,
    pub description: Option<String>,
    pub photos: Vec<String>,
    pub recommendations: Vec<String>,
    pub press_mentions: Vec<PressMention>,
    pub heritage_notes: Vec<String>,
}

impl SourceRecord {
    /// Name shown in titles and share text.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed source")
    }

    /// Municipality shown in titles, or an empty string.
    pub fn display_municipality(&self) -> &str {
        self.municipality.as_deref().unwrap_or("")
    }

    pub fn status(&self) -> AnalysisStatus {
        self.last_analysis.status
    }
}

// ---------------------------------------------------------------------------
// User-visible notices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A short, non-blocking message for the page's notification area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Info, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice { kind: NoticeKind::Error, message: message.into() }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while loading, looking up, or rendering sources.
///
/// None of these are fatal to a session: every variant ends either in the
/// fallback record, a notice, or an error panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SourcesError {
    /// The sources document could not be fetched or parsed.
    DataUnavailable(String),
    /// No record carries the requested identifier.
    RecordNotFound(String),
    /// A record is missing a field the detail panel cannot do without.
    RenderFailure { id: String, message: String },
    /// The browser offers no geolocation.
    GeolocationUnavailable,
    /// The user refused to share their position.
    GeolocationDenied,
    /// No position arrived within the request timeout.
    GeolocationTimeout,
    /// The configuration file could not be read or parsed.
    Config(String),
}

impl SourcesError {
    /// The notice shown to the user for this error.
    pub fn notice(&self) -> Notice {
        match self {
            SourcesError::DataUnavailable(_) => {
                Notice::info("Live data unavailable, showing demonstration data")
            }
            SourcesError::RecordNotFound(_) => Notice::error("Source not found"),
            SourcesError::RenderFailure { .. } => {
                Notice::error("This source could not be displayed")
            }
            SourcesError::GeolocationUnavailable => {
                Notice::error("Geolocation is not supported by your browser")
            }
            SourcesError::GeolocationDenied | SourcesError::GeolocationTimeout => {
                Notice::error("Unable to locate you")
            }
            SourcesError::Config(_) => Notice::error("Configuration error"),
        }
    }
}

impl std::fmt::Display for SourcesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourcesError::DataUnavailable(msg) => write!(f, "Data unavailable: {}", msg),
            SourcesError::RecordNotFound(id) => write!(f, "Source not found: {}", id),
            SourcesError::RenderFailure { id, message } => {
                write!(f, "Render failure for source {}: {}", id, message)
            }
            SourcesError::GeolocationUnavailable => write!(f, "Geolocation unavailable"),
            SourcesError::GeolocationDenied => write!(f, "Geolocation permission denied"),
            SourcesError::GeolocationTimeout => write!(f, "Geolocation timed out"),
            SourcesError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for SourcesError {}
