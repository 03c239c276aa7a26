//! Core event model: severities, categories, backend tags, and `LogEvent`.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{LogError, LogResult};
use crate::parser::LineRecord;
use crate::severity;

// ── Severity ──────────────────────────────────────────────────

/// Severity inferred from message text.
///
/// Declaration order is the classifier's tier order and also the order in
/// which severities appear in a summary breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Debug,
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Category ──────────────────────────────────────────────────

/// Logical grouping of extracted logs.
///
/// Serialized on events by its full name (`authentication`); report maps
/// are keyed by the shorter selection key (`auth`), see [`Category::key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Systemd,
    Kernel,
    Authentication,
    Application,
}

impl Category {
    /// Every category, in default extraction order.
    pub const ALL: [Category; 4] = [
        Self::Systemd,
        Self::Kernel,
        Self::Authentication,
        Self::Application,
    ];

    /// Selection identifier, also used as the key in report maps.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Systemd => "systemd",
            Self::Kernel => "kernel",
            Self::Authentication => "auth",
            Self::Application => "application",
        }
    }

    /// Name attached to individual events.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Systemd => "systemd",
            Self::Kernel => "kernel",
            Self::Authentication => "authentication",
            Self::Application => "application",
        }
    }

    /// Resolve a list of selection identifiers.
    ///
    /// Duplicates collapse to their first occurrence. Any name without a
    /// matching category fails the whole selection, and the error lists
    /// every unrecognized name.
    pub fn parse_selection<S: AsRef<str>>(names: &[S]) -> LogResult<Vec<Category>> {
        let mut selected = Vec::with_capacity(names.len());
        let mut unknown = Vec::new();

        for name in names {
            let name = name.as_ref();
            match name.parse::<Category>() {
                Ok(cat) if !selected.contains(&cat) => selected.push(cat),
                Ok(_) => {}
                Err(_) => unknown.push(name.to_string()),
            }
        }

        if !unknown.is_empty() {
            return Err(LogError::UnknownCategories(unknown));
        }
        Ok(selected)
    }
}

impl FromStr for Category {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.key() == s)
            .ok_or_else(|| LogError::UnknownCategories(vec![s.to_string()]))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ── Source Kind ───────────────────────────────────────────────

/// Backend that produced a raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// `journalctl` subprocess.
    Journalctl,
    /// Plain syslog-format text file.
    File,
    /// In-memory lines (tests and fixtures).
    Memory,
}

// ── Log Event ─────────────────────────────────────────────────

/// A normalized log event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Normalized timestamp, serialized as ISO-8601 without offset.
    pub timestamp: NaiveDateTime,
    pub hostname: String,
    pub service: String,
    pub pid: Option<u64>,
    /// Message body, trimmed.
    pub message: String,
    pub severity: Severity,
    pub source: SourceKind,
    pub category: Category,
    /// Queried service name, only set for the application category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    /// True when the line's timestamp could not be parsed and the
    /// extraction instant was used instead.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub timestamp_fallback: bool,
}

impl LogEvent {
    /// Build an event from a parsed line, classifying its message.
    pub fn from_record(record: LineRecord, source: SourceKind, category: Category) -> Self {
        let severity = severity::classify(&record.message);
        Self {
            timestamp: record.timestamp,
            hostname: record.hostname,
            service: record.service,
            pid: record.pid,
            message: record.message,
            severity,
            source,
            category,
            application: None,
            timestamp_fallback: record.timestamp_fallback,
        }
    }

    /// Tag the event with the application service it was queried for.
    pub fn with_application(mut self, application: impl Into<String>) -> Self {
        self.application = Some(application.into());
        self
    }
}
