//! Command-line arguments.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Backend;

/// Extract system logs by category and output them as JSON.
#[derive(Debug, Parser)]
#[command(name = "eml-extract", version, about, long_about = None)]
pub struct Cli {
    /// Log categories to extract (systemd, kernel, auth, application)
    #[arg(long, num_args = 1.., value_name = "CATEGORY")]
    pub categories: Option<Vec<String>>,

    /// Number of lines to extract per category
    #[arg(long, value_name = "N")]
    pub lines: Option<usize>,

    /// Output file (default: stdout)
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Pretty print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// TOML configuration file
    #[arg(long, short, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where log lines come from
    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Syslog file read by the `file` backend
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Only extract messages from this far back (e.g. 30m, 2h, 3d)
    #[arg(long, value_name = "DURATION")]
    pub since: Option<String>,

    /// Emit diagnostics on stderr as JSON lines
    #[arg(long)]
    pub log_json: bool,
}
