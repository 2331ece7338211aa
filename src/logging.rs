/// Structured logging for the sources service
///
/// Provides context-rich logging with component and source identifiers,
/// timestamps, and severity levels. Supports both console output
/// and file-based logging.

use chrono::Utc;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parses a level name as written in the configuration file.
    /// Unknown names fall back to `Info`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "warn" | "warning" => LogLevel::Warning,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// The part of the service a log line comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    Loader,
    Render,
    Map,
    Panel,
    Geo,
    System,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Loader => write!(f, "LOAD"),
            Component::Render => write!(f, "RENDER"),
            Component::Map => write!(f, "MAP"),
            Component::Panel => write!(f, "PANEL"),
            Component::Geo => write!(f, "GEO"),
            Component::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - e.g. the document is simply not deployed yet
    Expected,
    /// Unexpected failure - the document exists but is broken, or the server errors
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    min_level: LogLevel,
    /// Append-mode log file, opened once at init.
    file: Option<(String, File)>,
    /// Full entries (with timestamp) on the console instead of the short form
    console_timestamps: bool,
}

impl Logger {
    /// Installs the global logger. A log file that cannot be opened is
    /// reported once and logging carries on console-only.
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let file = log_file.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(&path) {
                Ok(file) => Some((path, file)),
                Err(e) => {
                    eprintln!("Cannot open log file {}: {}; logging to console only", path, e);
                    None
                }
            }
        });

        if let Ok(mut slot) = LOGGER.lock() {
            *slot = Some(Logger { min_level, file, console_timestamps });
        }
    }

    fn format_entry(level: LogLevel, component: &Component, source_id: Option<&str>, message: &str) -> String {
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let source_part = source_id.map(|s| format!(" [{}]", s)).unwrap_or_default();
        format!("{} {} {}{}: {}", timestamp, level, component, source_part, message)
    }

    fn log(&mut self, level: LogLevel, component: &Component, source_id: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let log_entry = Self::format_entry(level, component, source_id, message);
        let source_part = source_id.map(|s| format!(" [{}]", s)).unwrap_or_default();

        // Console output. stdout is reserved for command output, so
        // everything goes to stderr.
        if self.console_timestamps {
            eprintln!("{}", log_entry);
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", component, source_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", component, source_part, message),
                LogLevel::Info => eprintln!("   {}", message),
                LogLevel::Debug => eprintln!("   [DEBUG] {}{}: {}", component, source_part, message),
            }
        }

        if let Some((path, file)) = self.file.as_mut() {
            if let Err(e) = writeln!(file, "{}", log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

fn emit(level: LogLevel, component: Component, source_id: Option<&str>, message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(logger) = guard.as_mut() {
            logger.log(level, &component, source_id, message);
        }
    }
}

/// Log a general informational message
pub fn info(component: Component, source_id: Option<&str>, message: &str) {
    emit(LogLevel::Info, component, source_id, message);
}

/// Log a warning message
pub fn warn(component: Component, source_id: Option<&str>, message: &str) {
    emit(LogLevel::Warning, component, source_id, message);
}

/// Log an error message
pub fn error(component: Component, source_id: Option<&str>, message: &str) {
    emit(LogLevel::Error, component, source_id, message);
}

/// Log a debug message
pub fn debug(component: Component, source_id: Option<&str>, message: &str) {
    emit(LogLevel::Debug, component, source_id, message);
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify a sources-document load failure from its error message.
pub fn classify_load_failure(error_message: &str) -> FailureType {
    if error_message.contains("HTTP error: 404") || error_message.contains("No such file") {
        // Document not deployed yet: the demo record is the intended outcome.
        FailureType::Expected
    } else if error_message.contains("HTTP error") || error_message.contains("Parse error") {
        FailureType::Unexpected
    } else {
        FailureType::Unknown
    }
}

/// Log a document load failure with automatic classification
pub fn log_load_failure(location: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_load_failure(&error_msg);

    let message = format!(
        "loading {} failed [{}]: {}; using demonstration data",
        location,
        failure_type,
        error_msg
    );

    match failure_type {
        FailureType::Expected => info(Component::Loader, None, &message),
        FailureType::Unexpected => error(Component::Loader, None, &message),
        FailureType::Unknown => warn(Component::Loader, None, &message),
    }
}

// ---------------------------------------------------------------------------
// Load Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a document load
pub fn log_load_summary(total: usize, loaded: usize, skipped: usize) {
    let message = format!(
        "Sources loaded: {}/{} records, {} skipped",
        loaded,
        total,
        skipped
    );

    if skipped == 0 {
        info(Component::Loader, None, &message);
    } else if loaded == 0 {
        error(Component::Loader, None, &message);
    } else {
        warn(Component::Loader, None, &message);
    }
}
