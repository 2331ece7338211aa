/// Sources document ingestion.
///
/// Submodules:
/// - `document` — wire structures and the parse into typed records.
/// - `loader` — single-attempt fetch (HTTP or file) with demo fallback.

pub mod document;
pub mod loader;

pub use loader::{load, DataOrigin, DocumentSource, FileDocumentSource, HttpDocumentSource, LoadOutcome};
