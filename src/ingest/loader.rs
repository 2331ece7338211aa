/// Sources document loader
///
/// Fetches the sources document once and falls back to the embedded
/// demonstration record on any failure. A failed load is a warning, never
/// an error: the caller always gets a usable mapping back.
///
/// There is no retry. The HTTP client's request timeout bounds the wait.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::ingest::document::parse_document;
use crate::logging;
use crate::model::{SourceRecord, SourcesError};
use crate::store;

/// Relative path of the sources document on the site.
pub const DEFAULT_DATA_PATH: &str = "documents/data/sources.json";

// ============================================================================
// Document Sources
// ============================================================================

/// Where the sources document comes from.
pub trait DocumentSource {
    /// Human-readable location, used in log lines.
    fn location(&self) -> String;

    /// Retrieves the raw document body. A single attempt.
    fn fetch(&self) -> Result<String, SourcesError>;
}

/// The published document, fetched over HTTP.
pub struct HttpDocumentSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpDocumentSource {
    /// Builds a source for `data_path` resolved against `base_url`.
    pub fn new(base_url: &str, data_path: &str, timeout: Duration) -> Result<Self, SourcesError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SourcesError::DataUnavailable(format!("HTTP client setup failed: {}", e)))?;
        Ok(Self::with_client(client, document_url(base_url, data_path)?))
    }

    pub fn with_client(client: reqwest::blocking::Client, url: impl Into<String>) -> Self {
        HttpDocumentSource { client, url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DocumentSource for HttpDocumentSource {
    fn location(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<String, SourcesError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()
            .map_err(|e| SourcesError::DataUnavailable(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SourcesError::DataUnavailable(format!(
                "HTTP error: {}",
                response.status().as_u16()
            )));
        }

        response
            .text()
            .map_err(|e| SourcesError::DataUnavailable(format!("Failed to read response: {}", e)))
    }
}

/// A copy of the document on local disk.
pub struct FileDocumentSource {
    path: PathBuf,
}

impl FileDocumentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileDocumentSource { path: path.into() }
    }
}

impl DocumentSource for FileDocumentSource {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<String, SourcesError> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| SourcesError::DataUnavailable(format!("{}: {}", self.path.display(), e)))
    }
}

/// Resolves the document path against the site's base URL.
pub fn document_url(base_url: &str, data_path: &str) -> Result<String, SourcesError> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    let base = reqwest::Url::parse(&base)
        .map_err(|e| SourcesError::Config(format!("invalid base URL '{}': {}", base_url, e)))?;
    base.join(data_path.trim_start_matches('/'))
        .map(|url| url.to_string())
        .map_err(|e| SourcesError::Config(format!("invalid data path '{}': {}", data_path, e)))
}

// ============================================================================
// Loading
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    /// Records come from the sources document.
    Document,
    /// The document was unavailable; only the demonstration record is served.
    Fallback,
}

/// What a load produced.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub records: BTreeMap<String, SourceRecord>,
    pub origin: DataOrigin,
    /// The failure that caused a fallback. Already logged.
    pub warning: Option<SourcesError>,
    /// Document entries that could not be read.
    pub skipped: usize,
}

/// Loads the sources mapping from `source`.
///
/// On success the mapping is exactly the document's `sources` (possibly
/// empty). On any failure it is the single embedded demonstration record.
pub fn load(source: &dyn DocumentSource) -> LoadOutcome {
    match source.fetch().and_then(|body| parse_document(&body)) {
        Ok(parsed) => {
            logging::log_load_summary(parsed.total_entries, parsed.records.len(), parsed.skipped);
            LoadOutcome {
                records: parsed.records,
                origin: DataOrigin::Document,
                warning: None,
                skipped: parsed.skipped,
            }
        }
        Err(err) => {
            logging::log_load_failure(&source.location(), &err);
            LoadOutcome {
                records: store::fallback_records(),
                origin: DataOrigin::Fallback,
                warning: Some(err),
                skipped: 0,
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
