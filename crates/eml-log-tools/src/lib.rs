//! Log extraction and normalization for ExplainMyLogs.
//!
//! Queries a `LogSource` (journalctl, a syslog file, or an in-memory mock)
//! per category, parses journal "short" lines into `LogEvent`s with an
//! inferred severity, and aggregates them into an `ExtractionReport`.

pub mod error;
pub mod extractors;
pub mod journalctl;
pub mod mock;
pub mod orchestrator;
pub mod parser;
pub mod severity;
pub mod source;
pub mod summary;
pub mod types;

// Re-export key types for convenience
pub use error::{LogError, LogResult};
pub use extractors::{CategoryBatch, Extractor, ExtractorConfig, ExtractorSet};
pub use journalctl::{JournalctlConfig, JournalctlSource};
pub use mock::MockLogSource;
pub use orchestrator::Orchestrator;
pub use source::{FileLogSource, LogQuery, LogSource, QueryTarget};
pub use summary::{CategorySummary, ExtractionReport, TimeRange};
pub use types::{Category, LogEvent, Severity, SourceKind};
