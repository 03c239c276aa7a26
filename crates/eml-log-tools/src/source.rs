//! Log source abstraction: query raw lines from journald, files, or mocks.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::error::{LogError, LogResult};
use crate::parser;
use crate::types::SourceKind;

/// What a query selects from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryTarget {
    /// Every message, regardless of origin.
    All,
    /// Kernel ring buffer messages.
    Kernel,
    /// Messages of one systemd unit / syslog identifier.
    Unit(String),
}

impl std::fmt::Display for QueryTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Kernel => f.write_str("kernel"),
            Self::Unit(unit) => write!(f, "unit:{unit}"),
        }
    }
}

/// A request for the most recent `lines` messages of `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    pub target: QueryTarget,
    pub lines: usize,
    /// Messages older than this are not returned.
    pub since: Option<NaiveDateTime>,
}

impl LogQuery {
    fn new(target: QueryTarget, lines: usize) -> Self {
        Self {
            target,
            lines,
            since: None,
        }
    }

    pub fn all(lines: usize) -> Self {
        Self::new(QueryTarget::All, lines)
    }

    pub fn kernel(lines: usize) -> Self {
        Self::new(QueryTarget::Kernel, lines)
    }

    pub fn unit(unit: impl Into<String>, lines: usize) -> Self {
        Self::new(QueryTarget::Unit(unit.into()), lines)
    }

    pub fn with_since(mut self, since: Option<NaiveDateTime>) -> Self {
        self.since = since;
        self
    }

    /// Whether `line` falls inside this query's time window.
    ///
    /// Lines without a usable timestamp are kept so the extractor can account
    /// for them. Timestamps take their year from `since`.
    pub fn admits(&self, line: &str) -> bool {
        let Some(since) = self.since else {
            return true;
        };
        match parser::parse_line_at(line, since) {
            Some(rec) => rec.timestamp_fallback || rec.timestamp >= since,
            None => true,
        }
    }
}

/// Backend that returns raw log lines in the journal "short" format.
///
/// Injected into the extractors so tests can run against
/// [`MockLogSource`](crate::mock::MockLogSource) instead of a live journal.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Tag recorded on every event produced from this source.
    fn kind(&self) -> SourceKind;

    /// Return the most recent lines matching `query`, oldest first.
    async fn query(&self, query: &LogQuery) -> LogResult<Vec<String>>;

    /// Name of the host the logs belong to.
    async fn hostname(&self) -> LogResult<String> {
        local_hostname().await
    }
}

/// Read the kernel hostname of the machine we run on.
pub async fn local_hostname() -> LogResult<String> {
    for path in ["/proc/sys/kernel/hostname", "/etc/hostname"] {
        if let Ok(contents) = tokio::fs::read_to_string(path).await {
            let name = contents.trim();
            if !name.is_empty() {
                return Ok(name.to_string());
            }
        }
    }
    Err(LogError::NotFound("hostname".into()))
}

/// Reads a syslog-format text file such as `/var/log/messages`.
///
/// Kernel and unit queries are answered by filtering on the parsed service
/// name, so lines that do not parse are only returned for `All` queries.
pub struct FileLogSource {
    path: PathBuf,
}

impl FileLogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn read_lines(&self) -> LogResult<Vec<String>> {
        let display = self.path.display();
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    LogError::NotFound(display.to_string())
                } else {
                    LogError::Io(format!("{display}: {e}"))
                }
            })?;
        Ok(content.lines().map(String::from).collect())
    }
}

#[async_trait]
impl LogSource for FileLogSource {
    fn kind(&self) -> SourceKind {
        SourceKind::File
    }

    async fn query(&self, query: &LogQuery) -> LogResult<Vec<String>> {
        let all = self.read_lines().await?;
        let all = all.into_iter().filter(|l| query.admits(l));
        let matching: Vec<String> = match &query.target {
            QueryTarget::All => all.collect(),
            QueryTarget::Kernel => all
                .filter(|l| service_of(l).is_some_and(|s| s == "kernel"))
                .collect(),
            QueryTarget::Unit(unit) => {
                let unit = unit.strip_suffix(".service").unwrap_or(unit);
                all.filter(|l| service_of(l).is_some_and(|s| s == unit))
                    .collect()
            }
        };
        let start = matching.len().saturating_sub(query.lines);
        Ok(matching[start..].to_vec())
    }
}

fn service_of(line: &str) -> Option<String> {
    parser::parse_line(line).map(|rec| rec.service)
}
