//! eml-extract: pull recent system logs by category and print them as JSON.
//!
//! Diagnostics go to stderr so stdout carries only the report.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use eml_cli::cli::Cli;
use eml_cli::config::ExtractConfig;
use eml_cli::output;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "eml-extract starting");

    // ── Load config ─────────────────────────────────────────────
    let config = ExtractConfig::load(&cli)?;
    tracing::debug!(
        backend = ?config.backend,
        lines_per_category = config.lines_per_category,
        categories = ?config.categories,
        since = ?config.since,
        "config loaded"
    );

    if !eml_cli::is_root() {
        tracing::warn!("running as non-root user, some logs may not be accessible");
    }

    // ── Extract ─────────────────────────────────────────────────
    let source = eml_cli::build_source(&config);
    let report = eml_cli::extract(&config, source.as_ref()).await?;

    // ── Output ──────────────────────────────────────────────────
    let json = output::render(&report, config.pretty)?;
    output::write(&json, cli.output.as_deref())?;

    Ok(())
}
