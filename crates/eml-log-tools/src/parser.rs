//! Parser for journal "short" output and BSD syslog lines.
//!
//! Shape: `Mmm dd HH:MM:SS HOSTNAME SERVICE[PID]: MESSAGE`, where the `[PID]`
//! segment and any whitespace before the colon are optional.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use regex::Regex;
use std::sync::LazyLock;

static RE_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})\s+(\S+)\s+(\S+?)(?:\[(\d+)\])?\s*:\s*(.*)$")
        .unwrap()
});

const TIMESTAMP_FORMAT: &str = "%Y %b %e %H:%M:%S";

/// Fields extracted from a single line, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub timestamp: NaiveDateTime,
    /// Set when the timestamp token did not parse and `now` was substituted.
    pub timestamp_fallback: bool,
    pub hostname: String,
    pub service: String,
    pub pid: Option<u64>,
    pub message: String,
}

/// Outcome of feeding one raw line to the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Record(LineRecord),
    /// Blank line or a journalctl marker such as `-- No entries --`.
    Skipped,
    /// Non-blank line that does not have the expected shape.
    Malformed,
}

/// Parse a line using the local clock for the year and fallback timestamp.
pub fn parse_line(line: &str) -> Option<LineRecord> {
    parse_line_at(line, Local::now().naive_local())
}

/// Parse a line relative to the reference instant `now`.
///
/// Returns `None` when the line does not match the expected shape.
pub fn parse_line_at(line: &str, now: NaiveDateTime) -> Option<LineRecord> {
    let caps = RE_SHORT.captures(line.trim())?;

    // A bracketed pid that does not fit is a malformed line, not a missing pid.
    let pid = match caps.get(4) {
        Some(m) => Some(m.as_str().parse::<u64>().ok()?),
        None => None,
    };

    let (timestamp, timestamp_fallback) = match normalize_timestamp(&caps[1], now.year()) {
        Some(ts) => (ts, false),
        None => (now.with_nanosecond(0).unwrap_or(now), true),
    };

    Some(LineRecord {
        timestamp,
        timestamp_fallback,
        hostname: caps[2].to_string(),
        service: caps[3].to_string(),
        pid,
        message: caps[5].trim().to_string(),
    })
}

/// Classify a raw line as a record, a skippable line, or malformed input.
pub fn classify_line(line: &str, now: NaiveDateTime) -> ParsedLine {
    let trimmed = line.trim();
    if trimmed.is_empty() || is_journal_marker(trimmed) {
        return ParsedLine::Skipped;
    }
    match parse_line_at(trimmed, now) {
        Some(record) => ParsedLine::Record(record),
        None => ParsedLine::Malformed,
    }
}

/// journalctl prints `-- ... --` lines for boot boundaries and empty results.
fn is_journal_marker(line: &str) -> bool {
    line.starts_with("-- ")
}

/// Prepend `year` to a `Mmm dd HH:MM:SS` token and parse it.
fn normalize_timestamp(token: &str, year: i32) -> Option<NaiveDateTime> {
    let with_year = format!("{year} {token}");
    NaiveDateTime::parse_from_str(&with_year, TIMESTAMP_FORMAT).ok()
}
