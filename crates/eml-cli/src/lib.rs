//! ExplainMyLogs extractor CLI: library half.
//!
//! Exposes config loading, backend selection, and report output so the
//! end-to-end tests can drive a run without spawning the binary.

pub mod cli;
pub mod config;
pub mod output;

use chrono::{Local, Timelike};
use eml_log_tools::{ExtractionReport, FileLogSource, JournalctlSource, LogSource, Orchestrator};

use crate::config::{Backend, ExtractConfig};

/// Build the log source selected by `config`.
pub fn build_source(config: &ExtractConfig) -> Box<dyn LogSource> {
    match config.backend {
        Backend::Journalctl => Box::new(JournalctlSource::new(config.journalctl.clone())),
        Backend::File => Box::new(FileLogSource::new(config.log_file.clone())),
    }
}

/// Run one extraction pass against `source`.
///
/// Unknown category names and a bad `since` window are configuration errors;
/// backend failures are not, they only leave the affected category empty.
pub async fn extract(
    config: &ExtractConfig,
    source: &dyn LogSource,
) -> anyhow::Result<ExtractionReport> {
    let now = Local::now().naive_local();
    let now = now.with_nanosecond(0).unwrap_or(now);
    let since = config.since_window()?.map(|window| now - window);
    let orchestrator = Orchestrator::from_config(&config.extractors).with_since(since);
    let report = orchestrator
        .run_named(source, config.categories.as_slice(), config.lines_per_category)
        .await?;
    Ok(report)
}

/// Whether the current process runs with effective uid 0.
pub fn is_root() -> bool {
    nix::unistd::Uid::effective().is_root()
}
