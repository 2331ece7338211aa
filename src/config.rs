/// Service configuration
///
/// Read from a TOML file (`sources.toml` by default). Every field has a
/// default, so a missing file or a partial file is fine. After the file,
/// `SOURCES_*` environment variables (optionally from `.env`) override
/// individual values.

use std::path::Path;

use serde::Deserialize;

use crate::geo::GeolocationOptions;
use crate::ingest::loader::DEFAULT_DATA_PATH;
use crate::logging::LogLevel;
use crate::model::{Coordinates, SourcesError};
use crate::render::RenderOptions;

pub const DEFAULT_CONFIG_PATH: &str = "./sources.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Public site root; share links and the document URL hang off it.
    pub base_url: String,
    /// Sources document path, relative to `base_url`.
    pub data_path: String,
    /// Recipient of "report a problem" e-mails.
    pub report_recipient: String,
    /// Path prefix for source photos.
    pub photo_path: String,
    /// Request timeout for the single document fetch.
    pub http_timeout_secs: u64,
    pub map: MapConfig,
    pub geolocation: GeolocationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeolocationConfig {
    pub high_accuracy: bool,
    pub timeout_secs: u64,
    pub maximum_age_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: "https://sources-vivantes.fr".to_string(),
            data_path: DEFAULT_DATA_PATH.to_string(),
            report_recipient: "contact@sources-vivantes.fr".to_string(),
            photo_path: "images/sources".to_string(),
            http_timeout_secs: 30,
            map: MapConfig::default(),
            geolocation: GeolocationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        // Dordogne
        MapConfig { center_lat: 44.9, center_lng: 0.9, zoom: 9 }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        let defaults = GeolocationOptions::default();
        GeolocationConfig {
            high_accuracy: defaults.high_accuracy,
            timeout_secs: defaults.timeout_secs,
            maximum_age_secs: defaults.maximum_age_secs,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig { level: "info".to_string(), file: None, timestamps: false }
    }
}

impl Config {
    /// Parses a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, SourcesError> {
        toml::from_str(text).map_err(|e| SourcesError::Config(e.to_string()))
    }

    /// Loads `path` if it exists (defaults otherwise), then applies
    /// environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourcesError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(path)
                .map_err(|e| SourcesError::Config(format!("{}: {}", path.display(), e)))?;
            Self::from_toml(&text)?
        } else {
            Config::default()
        };

        dotenv::dotenv().ok();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies `SOURCES_*` overrides read through `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SourcesError> {
        if let Some(v) = lookup("SOURCES_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("SOURCES_DATA_PATH") {
            self.data_path = v;
        }
        if let Some(v) = lookup("SOURCES_REPORT_RECIPIENT") {
            self.report_recipient = v;
        }
        if let Some(v) = lookup("SOURCES_HTTP_TIMEOUT_SECS") {
            self.http_timeout_secs = v
                .parse()
                .map_err(|_| SourcesError::Config(format!("SOURCES_HTTP_TIMEOUT_SECS: not a number: {}", v)))?;
        }
        if let Some(v) = lookup("SOURCES_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("SOURCES_LOG_FILE") {
            self.logging.file = Some(v);
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions { photo_base_path: self.photo_path.clone() }
    }

    pub fn geolocation_options(&self) -> GeolocationOptions {
        GeolocationOptions {
            high_accuracy: self.geolocation.high_accuracy,
            timeout_secs: self.geolocation.timeout_secs,
            maximum_age_secs: self.geolocation.maximum_age_secs,
        }
    }

    pub fn map_center(&self) -> Coordinates {
        Coordinates { lat: self.map.center_lat, lng: self.map.center_lng }
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_name(&self.logging.level)
    }
}
