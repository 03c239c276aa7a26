//! Keyword-based severity classification.
//!
//! Tiers are checked from most to least severe and the first tier with a
//! matching keyword wins. Matching is a case-insensitive substring search,
//! so `err` also matches inside words such as `stderr`.

use crate::types::Severity;

const SEVERITY_TIERS: [(Severity, &[&str]); 4] = [
    (
        Severity::Error,
        &["error", "err", "failed", "failure", "exception"],
    ),
    (Severity::Warning, &["warn", "warning"]),
    (Severity::Info, &["info", "information"]),
    (Severity::Debug, &["debug", "dbg"]),
];

/// Infer a severity from message text.
pub fn classify(message: &str) -> Severity {
    let lower = message.to_lowercase();
    SEVERITY_TIERS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(severity, _)| *severity)
        .unwrap_or(Severity::Unknown)
}
