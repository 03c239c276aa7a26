//! Per-category extraction strategies.
//!
//! Each [`Extractor`] turns one category request into one or more
//! [`LogQuery`]s, parses the returned lines, and tags the resulting events.
//! A failing query contributes no events and is reported as a warning.

use chrono::NaiveDateTime;
use serde::Deserialize;

use crate::parser::{self, ParsedLine};
use crate::source::{LogQuery, LogSource};
use crate::types::{Category, LogEvent};

/// Which units the authentication and application extractors query.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Unit queried for the authentication category.
    #[serde(default = "default_auth_unit")]
    pub auth_unit: String,
    /// Units queried for the application category, in query order.
    #[serde(default = "default_application_services")]
    pub application_services: Vec<String>,
}

fn default_auth_unit() -> String {
    "sshd".to_string()
}

fn default_application_services() -> Vec<String> {
    ["httpd", "nginx", "docker", "postgresql", "mysql", "mariadb"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            auth_unit: default_auth_unit(),
            application_services: default_application_services(),
        }
    }
}

/// Events produced for one category, plus the count of dropped lines.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBatch {
    pub category: Category,
    /// Events in source order.
    pub events: Vec<LogEvent>,
    /// Non-blank lines that did not have the expected shape.
    pub parse_failures: usize,
}

impl CategoryBatch {
    fn new(category: Category) -> Self {
        Self {
            category,
            events: Vec::new(),
            parse_failures: 0,
        }
    }
}

/// Extraction strategy for one category.
#[derive(Debug, Clone, PartialEq)]
pub enum Extractor {
    /// Most recent general journal lines.
    Systemd,
    /// Most recent kernel lines.
    Kernel,
    /// Most recent lines of a single authentication unit.
    Auth { unit: String },
    /// An even share of the line budget for each listed service.
    Application { services: Vec<String> },
}

impl Extractor {
    pub fn category(&self) -> Category {
        match self {
            Self::Systemd => Category::Systemd,
            Self::Kernel => Category::Kernel,
            Self::Auth { .. } => Category::Authentication,
            Self::Application { .. } => Category::Application,
        }
    }

    /// Run this extractor with a budget of `lines`.
    ///
    /// `now` supplies the year for timestamps and the fallback instant for
    /// timestamps that do not parse.
    pub async fn extract(
        &self,
        source: &dyn LogSource,
        lines: usize,
        now: NaiveDateTime,
    ) -> CategoryBatch {
        self.extract_since(source, lines, None, now).await
    }

    /// Like [`extract`](Self::extract), skipping messages older than `since`.
    pub async fn extract_since(
        &self,
        source: &dyn LogSource,
        lines: usize,
        since: Option<NaiveDateTime>,
        now: NaiveDateTime,
    ) -> CategoryBatch {
        let mut batch = CategoryBatch::new(self.category());

        match self {
            Self::Systemd => {
                let query = LogQuery::all(lines).with_since(since);
                collect(source, &query, None, now, &mut batch).await;
            }
            Self::Kernel => {
                let query = LogQuery::kernel(lines).with_since(since);
                collect(source, &query, None, now, &mut batch).await;
            }
            Self::Auth { unit } => {
                let query = LogQuery::unit(unit, lines).with_since(since);
                collect(source, &query, None, now, &mut batch).await;
            }
            Self::Application { services } => {
                if services.is_empty() {
                    return batch;
                }
                // Integer share; the remainder of the budget is not used.
                let per_service = lines / services.len();
                if per_service == 0 {
                    tracing::debug!(
                        lines,
                        services = services.len(),
                        "line budget too small for application services"
                    );
                    return batch;
                }
                for service in services {
                    let query = LogQuery::unit(service, per_service).with_since(since);
                    collect(source, &query, Some(service.as_str()), now, &mut batch).await;
                }
            }
        }

        batch
    }
}

async fn collect(
    source: &dyn LogSource,
    query: &LogQuery,
    application: Option<&str>,
    now: NaiveDateTime,
    batch: &mut CategoryBatch,
) {
    let lines = match source.query(query).await {
        Ok(lines) => lines,
        Err(e) => {
            tracing::warn!(
                category = %batch.category,
                target = %query.target,
                error = %e,
                "log query failed, continuing without its events"
            );
            return;
        }
    };

    let kind = source.kind();
    for line in &lines {
        match parser::classify_line(line, now) {
            ParsedLine::Record(record) => {
                let event = LogEvent::from_record(record, kind, batch.category);
                let event = match application {
                    Some(app) => event.with_application(app),
                    None => event,
                };
                batch.events.push(event);
            }
            ParsedLine::Malformed => {
                tracing::trace!(category = %batch.category, line = %line, "dropping malformed line");
                batch.parse_failures += 1;
            }
            ParsedLine::Skipped => {}
        }
    }
}

/// Lookup table from category to its configured extractor.
#[derive(Debug, Clone)]
pub struct ExtractorSet {
    systemd: Extractor,
    kernel: Extractor,
    auth: Extractor,
    application: Extractor,
}

impl ExtractorSet {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            systemd: Extractor::Systemd,
            kernel: Extractor::Kernel,
            auth: Extractor::Auth {
                unit: config.auth_unit.clone(),
            },
            application: Extractor::Application {
                services: config.application_services.clone(),
            },
        }
    }

    pub fn get(&self, category: Category) -> &Extractor {
        match category {
            Category::Systemd => &self.systemd,
            Category::Kernel => &self.kernel,
            Category::Authentication => &self.auth,
            Category::Application => &self.application,
        }
    }
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}
