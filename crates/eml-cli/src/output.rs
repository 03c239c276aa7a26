//! Report rendering and delivery.

use anyhow::Context;
use eml_log_tools::ExtractionReport;
use std::io::Write;
use std::path::Path;

/// Serialize the report, indented when `pretty` is set.
pub fn render(report: &ExtractionReport, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

/// Write rendered JSON to `path`, or to stdout when no path is given.
pub fn write(json: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "logs extracted");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
