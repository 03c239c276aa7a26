//! Extractor configuration, loadable from TOML and overridable from flags.

use anyhow::{Context, anyhow, bail};
use chrono::TimeDelta;
use eml_log_tools::{Category, ExtractorConfig, JournalctlConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cli::Cli;

/// Where log lines come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Query the systemd journal with `journalctl`.
    #[default]
    Journalctl,
    /// Read a syslog-format text file.
    File,
}

/// Top-level configuration for one extraction run.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractConfig {
    /// Category selection identifiers, extracted in this order.
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Line budget for each category.
    #[serde(default = "default_lines_per_category")]
    pub lines_per_category: usize,
    #[serde(default)]
    pub backend: Backend,
    /// Syslog file for the `file` backend.
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
    /// Indent the JSON output.
    #[serde(default)]
    pub pretty: bool,
    /// Relative time window such as `2h`; unset means no lower bound.
    #[serde(default)]
    pub since: Option<String>,
    #[serde(default)]
    pub extractors: ExtractorConfig,
    #[serde(default)]
    pub journalctl: JournalctlConfig,
}

fn default_categories() -> Vec<String> {
    Category::ALL.iter().map(|c| c.key().to_string()).collect()
}

fn default_lines_per_category() -> usize {
    50
}

fn default_log_file() -> PathBuf {
    PathBuf::from("/var/log/messages")
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            lines_per_category: default_lines_per_category(),
            backend: Backend::default(),
            log_file: default_log_file(),
            pretty: false,
            since: None,
            extractors: ExtractorConfig::default(),
            journalctl: JournalctlConfig::default(),
        }
    }
}

impl ExtractConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load the file named by `--config` (if any), then apply flag overrides.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    /// Flags given on the command line win over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(categories) = &cli.categories {
            self.categories = categories.clone();
        }
        if let Some(lines) = cli.lines {
            self.lines_per_category = lines;
        }
        if let Some(backend) = cli.backend {
            self.backend = backend;
        }
        if let Some(path) = &cli.log_file {
            self.log_file = path.clone();
        }
        if cli.pretty {
            self.pretty = true;
        }
        if let Some(since) = &cli.since {
            self.since = Some(since.clone());
        }
    }

    /// The configured time window, parsed.
    pub fn since_window(&self) -> anyhow::Result<Option<TimeDelta>> {
        self.since.as_deref().map(parse_duration).transpose()
    }
}

/// Parse `<count><unit>` with unit `d`, `h` or `m` (any case).
pub fn parse_duration(text: &str) -> anyhow::Result<TimeDelta> {
    let text = text.trim();
    let Some(unit) = text.chars().last() else {
        bail!("empty duration");
    };
    let count: u32 = text[..text.len() - unit.len_utf8()].parse().with_context(|| {
        format!("invalid duration {text:?}: expected a whole number before the unit")
    })?;
    let count = i64::from(count);
    let delta = match unit.to_ascii_lowercase() {
        'd' => TimeDelta::try_days(count),
        'h' => TimeDelta::try_hours(count),
        'm' => TimeDelta::try_minutes(count),
        _ => bail!("invalid duration {text:?}: unit must be d (days), h (hours) or m (minutes)"),
    };
    delta.ok_or_else(|| anyhow!("duration {text:?} is out of range"))
}
