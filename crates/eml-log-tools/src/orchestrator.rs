//! Drives the requested extractors and assembles the report.

use chrono::{Local, NaiveDateTime, Timelike};

use crate::error::LogResult;
use crate::extractors::{CategoryBatch, ExtractorConfig, ExtractorSet};
use crate::source::LogSource;
use crate::summary::ExtractionReport;
use crate::types::Category;

/// Hostname reported when the source cannot tell us.
const UNKNOWN_HOST: &str = "unknown";

/// Runs one extraction pass over a log source.
pub struct Orchestrator {
    extractors: ExtractorSet,
    since: Option<NaiveDateTime>,
}

impl Orchestrator {
    pub fn new(extractors: ExtractorSet) -> Self {
        Self {
            extractors,
            since: None,
        }
    }

    /// Only extract messages logged at or after `since`.
    pub fn with_since(mut self, since: Option<NaiveDateTime>) -> Self {
        self.since = since;
        self
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(ExtractorSet::new(config))
    }

    /// Extract categories given by selection identifiers.
    ///
    /// Fails without querying anything if any name is unknown.
    pub async fn run_named<S: AsRef<str>>(
        &self,
        source: &dyn LogSource,
        names: &[S],
        lines_per_category: usize,
    ) -> LogResult<ExtractionReport> {
        let categories = Category::parse_selection(names)?;
        Ok(self.run(source, &categories, lines_per_category).await)
    }

    /// Extract every category in default order.
    pub async fn run_all(
        &self,
        source: &dyn LogSource,
        lines_per_category: usize,
    ) -> ExtractionReport {
        self.run(source, &Category::ALL, lines_per_category).await
    }

    pub async fn run(
        &self,
        source: &dyn LogSource,
        categories: &[Category],
        lines_per_category: usize,
    ) -> ExtractionReport {
        let now = Local::now().naive_local();
        let now = now.with_nanosecond(0).unwrap_or(now);
        self.run_at(source, categories, lines_per_category, now).await
    }

    /// Like [`run`](Self::run) with an explicit extraction instant.
    pub async fn run_at(
        &self,
        source: &dyn LogSource,
        categories: &[Category],
        lines_per_category: usize,
        now: NaiveDateTime,
    ) -> ExtractionReport {
        let hostname = match source.hostname().await {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(error = %e, "could not determine hostname");
                UNKNOWN_HOST.to_string()
            }
        };

        let mut batches: Vec<CategoryBatch> = Vec::with_capacity(categories.len());
        for &category in categories {
            if batches.iter().any(|b| b.category == category) {
                continue;
            }
            tracing::info!(
                category = %category,
                lines = lines_per_category,
                since = ?self.since,
                "extracting logs"
            );
            let batch = self
                .extractors
                .get(category)
                .extract_since(source, lines_per_category, self.since, now)
                .await;
            tracing::debug!(
                category = %category,
                events = batch.events.len(),
                parse_failures = batch.parse_failures,
                "category extracted"
            );
            batches.push(batch);
        }

        let report = ExtractionReport::assemble(now, hostname, batches);
        tracing::info!(
            categories = report.categories.len(),
            total_logs = report.summary.total_logs,
            "extraction complete"
        );
        report
    }
}

impl Default for Orchestrator {
    fn default() -> Self {
        Self::new(ExtractorSet::default())
    }
}
