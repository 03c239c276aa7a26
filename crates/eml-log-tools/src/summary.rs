//! Aggregation of category batches into summaries and the final report.

use chrono::NaiveDateTime;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

use crate::extractors::CategoryBatch;
use crate::types::{Category, LogEvent, Severity};

/// Earliest and latest event timestamps; both `None` for an empty category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct TimeRange {
    pub earliest: Option<NaiveDateTime>,
    pub latest: Option<NaiveDateTime>,
}

impl TimeRange {
    /// Normalized timestamps are zero-padded, so ordering the values is the
    /// same as ordering their ISO-8601 strings.
    pub fn of(events: &[LogEvent]) -> Self {
        Self {
            earliest: events.iter().map(|e| e.timestamp).min(),
            latest: events.iter().map(|e| e.timestamp).max(),
        }
    }
}

/// Per-category statistics.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CategorySummary {
    pub total_entries: usize,
    /// Only severities that occurred at least once.
    pub severity_breakdown: BTreeMap<Severity, usize>,
    pub time_range: TimeRange,
    /// Lines dropped because they did not parse.
    pub parse_failures: usize,
}

impl CategorySummary {
    pub fn from_events(events: &[LogEvent], parse_failures: usize) -> Self {
        let mut severity_breakdown: BTreeMap<Severity, usize> = BTreeMap::new();
        for event in events {
            *severity_breakdown.entry(event.severity).or_default() += 1;
        }
        Self {
            total_entries: events.len(),
            severity_breakdown,
            time_range: TimeRange::of(events),
            parse_failures,
        }
    }
}

/// Events per category, in the order the categories were extracted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryEvents(Vec<(Category, Vec<LogEvent>)>);

impl CategoryEvents {
    pub fn get(&self, category: Category) -> Option<&[LogEvent]> {
        self.0
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, events)| events.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[LogEvent])> {
        self.0.iter().map(|(c, events)| (*c, events.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryEvents {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, events) in &self.0 {
            map.serialize_entry(category.key(), events)?;
        }
        map.end()
    }
}

/// Per-category summaries plus the overall event count.
///
/// Serialized as one map: category keys first, then `total_logs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSummary {
    categories: Vec<(Category, CategorySummary)>,
    pub total_logs: usize,
}

impl ReportSummary {
    pub fn get(&self, category: Category) -> Option<&CategorySummary> {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, summary)| summary)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategorySummary)> {
        self.categories.iter().map(|(c, s)| (*c, s))
    }
}

impl Serialize for ReportSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len() + 1))?;
        for (category, summary) in &self.categories {
            map.serialize_entry(category.key(), summary)?;
        }
        map.serialize_entry("total_logs", &self.total_logs)?;
        map.end()
    }
}

/// Result of one extraction run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExtractionReport {
    pub extraction_time: NaiveDateTime,
    pub hostname: String,
    pub categories: CategoryEvents,
    pub summary: ReportSummary,
}

impl ExtractionReport {
    /// Summarize each batch and assemble the report, keeping batch order.
    pub fn assemble(
        extraction_time: NaiveDateTime,
        hostname: impl Into<String>,
        batches: Vec<CategoryBatch>,
    ) -> Self {
        let mut categories = Vec::with_capacity(batches.len());
        let mut summaries = Vec::with_capacity(batches.len());

        for batch in batches {
            let summary = CategorySummary::from_events(&batch.events, batch.parse_failures);
            summaries.push((batch.category, summary));
            categories.push((batch.category, batch.events));
        }

        let total_logs = summaries.iter().map(|(_, s)| s.total_entries).sum();

        Self {
            extraction_time,
            hostname: hostname.into(),
            categories: CategoryEvents(categories),
            summary: ReportSummary {
                categories: summaries,
                total_logs,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceKind;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn event(ts: NaiveDateTime, severity: Severity, category: Category) -> LogEvent {
        LogEvent {
            timestamp: ts,
            hostname: "edge1".into(),
            service: "svc".into(),
            pid: None,
            message: "msg".into(),
            severity,
            source: SourceKind::Memory,
            category,
            application: None,
            timestamp_fallback: false,
        }
    }

    fn batch(category: Category, events: Vec<LogEvent>, parse_failures: usize) -> CategoryBatch {
        CategoryBatch {
            category,
            events,
            parse_failures,
        }
    }

    #[test]
    fn empty_summary() {
        let summary = CategorySummary::from_events(&[], 0);
        assert_eq!(summary.total_entries, 0);
        assert!(summary.severity_breakdown.is_empty());
        assert_eq!(summary.time_range, TimeRange::default());
    }

    #[test]
    fn empty_time_range_serializes_nulls() {
        let json = serde_json::to_value(CategorySummary::from_events(&[], 2)).unwrap();
        assert!(json["time_range"]["earliest"].is_null());
        assert!(json["time_range"]["latest"].is_null());
        assert_eq!(json["time_range"].as_object().unwrap().len(), 2);
        assert_eq!(json["parse_failures"], 2);
    }

    #[test]
    fn breakdown_has_only_observed_severities() {
        let events = vec![
            event(at(12, 0, 0), Severity::Error, Category::Kernel),
            event(at(12, 0, 1), Severity::Error, Category::Kernel),
            event(at(12, 0, 2), Severity::Debug, Category::Kernel),
        ];
        let summary = CategorySummary::from_events(&events, 0);
        assert_eq!(summary.severity_breakdown.len(), 2);
        assert_eq!(summary.severity_breakdown[&Severity::Error], 2);
        assert_eq!(summary.severity_breakdown[&Severity::Debug], 1);
        assert!(!summary.severity_breakdown.contains_key(&Severity::Info));

        let json = serde_json::to_value(&summary).unwrap();
        let breakdown = json["severity_breakdown"].as_object().unwrap();
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown["ERROR"], 2);
        assert_eq!(breakdown["DEBUG"], 1);
    }

    #[test]
    fn time_range_ignores_event_order() {
        let events = vec![
            event(at(12, 5, 0), Severity::Info, Category::Systemd),
            event(at(11, 59, 59), Severity::Info, Category::Systemd),
            event(at(12, 1, 0), Severity::Info, Category::Systemd),
        ];
        let range = TimeRange::of(&events);
        assert_eq!(range.earliest, Some(at(11, 59, 59)));
        assert_eq!(range.latest, Some(at(12, 5, 0)));
    }

    #[test]
    fn total_logs_sums_categories() {
        let report = ExtractionReport::assemble(
            at(13, 0, 0),
            "edge1",
            vec![
                batch(
                    Category::Systemd,
                    vec![
                        event(at(12, 0, 0), Severity::Info, Category::Systemd),
                        event(at(12, 0, 1), Severity::Warning, Category::Systemd),
                    ],
                    1,
                ),
                batch(Category::Kernel, vec![], 0),
                batch(
                    Category::Authentication,
                    vec![event(at(12, 0, 2), Severity::Error, Category::Authentication)],
                    0,
                ),
            ],
        );
        assert_eq!(report.summary.total_logs, 3);
        let sum: usize = report.summary.iter().map(|(_, s)| s.total_entries).sum();
        assert_eq!(sum, report.summary.total_logs);
        assert_eq!(report.summary.get(Category::Kernel).unwrap().total_entries, 0);
        assert!(report.summary.get(Category::Application).is_none());
    }

    #[test]
    fn empty_report() {
        let report = ExtractionReport::assemble(at(13, 0, 0), "edge1", vec![]);
        assert!(report.categories.is_empty());
        assert_eq!(report.summary.total_logs, 0);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["summary"]["total_logs"], 0);
        assert!(json["categories"].as_object().unwrap().is_empty());
    }

    #[test]
    fn report_serializes_in_field_and_category_order() {
        let report = ExtractionReport::assemble(
            at(13, 0, 0),
            "edge1",
            vec![
                batch(Category::Kernel, vec![], 0),
                batch(Category::Authentication, vec![], 0),
            ],
        );
        let text = serde_json::to_string(&report).unwrap();
        let pos = |needle: &str| text.find(needle).unwrap();
        assert!(pos("\"extraction_time\"") < pos("\"hostname\""));
        assert!(pos("\"hostname\"") < pos("\"categories\""));
        assert!(pos("\"categories\"") < pos("\"summary\""));
        assert!(text.contains("\"categories\":{\"kernel\":[],\"auth\":[]}"));
        assert!(text.ends_with("\"total_logs\":0}}"));
        assert!(text.starts_with("{\"extraction_time\":\"2026-01-15T13:00:00\""));
    }
}
