//! Report service
//!
//! Runs one report end to end: generate the periods, fetch every configured
//! account in order, fold the records into a single aggregation table and
//! render the requested documents from it.

use std::fmt;

use tracing::{debug, info, warn};

use crate::config::ReportConfig;
use crate::display::{render_html, render_markdown};
use crate::error::{ReportError, ReportResult};
use crate::models::{AggregationTable, Period};
use crate::reports::ReportSet;
use crate::services::{Aggregator, DataFetcher, IngestSummary, PeriodService};

/// Encoding of a rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Markdown,
    Html,
}

impl DocumentFormat {
    /// File extension of documents in this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
        }
    }
}

/// A finished document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub format: DocumentFormat,
    pub content: String,
}

impl RenderedDocument {
    /// File name for this document, e.g. `monthly.md`
    pub fn file_name(&self, report_name: &str) -> String {
        format!("{}.{}", report_name, self.format.extension())
    }
}

/// Result of one report run
#[derive(Debug)]
pub struct ReportRun<'a> {
    config: &'a ReportConfig,
    /// Report periods, in order
    pub periods: Vec<Period>,
    /// The finished aggregation table
    pub table: AggregationTable,
    /// Accounts whose fetch failed; they contributed nothing
    pub fetch_failures: Vec<ReportError>,
    /// Record outcome counts over the whole run
    pub summary: IngestSummary,
}

impl<'a> ReportRun<'a> {
    /// Build every table and chart of the report
    pub fn report_set(&self) -> ReportSet {
        ReportSet::build(
            &self.table,
            &self.periods,
            &self.config.category_filter(),
            self.config.sort_by,
            self.config.report_kind,
        )
    }

    /// Render the requested documents, markdown first
    pub fn render(&self) -> ReportResult<Vec<RenderedDocument>> {
        let set = self.report_set();
        let format = self.config.report_format;
        let mut documents = Vec::new();

        if format.wants_markdown() {
            documents.push(RenderedDocument {
                format: DocumentFormat::Markdown,
                content: render_markdown(&self.config.report_name, &set),
            });
        }

        if format.wants_html() {
            documents.push(RenderedDocument {
                format: DocumentFormat::Html,
                content: render_html(&self.config.report_name, &set)?,
            });
        }

        Ok(documents)
    }

    /// Whether every configured account was fetched
    pub fn is_complete(&self) -> bool {
        self.fetch_failures.is_empty()
    }
}

/// Service that runs reports
pub struct ReportService<'a> {
    config: &'a ReportConfig,
}

impl<'a> ReportService<'a> {
    /// Create a report service for a validated configuration
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Fetch and aggregate every configured account
    ///
    /// A failed fetch is logged and counted as zero records; it never aborts
    /// the run.
    pub fn run(&self, fetcher: &dyn DataFetcher) -> ReportRun<'a> {
        let periods = PeriodService::new(self.config).periods();
        if periods.is_empty() {
            warn!(
                start = %self.config.start_date,
                end = %self.config.end_date,
                "Report window contains no periods"
            );
        }

        let mut aggregator = Aggregator::from_config(self.config);
        let mut fetch_failures = Vec::new();

        for account in &self.config.profiles {
            match fetcher.fetch(account) {
                Ok(records) => {
                    let fetched = records.len();
                    let summary = aggregator.ingest_all(records);
                    info!(account = %account, records = fetched, "Fetched account");
                    debug!(
                        account = %account,
                        accepted = summary.accepted,
                        folded = summary.folded,
                        excluded = summary.excluded,
                        rejected = summary.rejected,
                        "Aggregated account"
                    );
                }
                Err(e) => {
                    warn!(account = %account, error = %e, "Fetch failed, account contributes nothing");
                    fetch_failures.push(e);
                }
            }
        }

        let summary = aggregator.summary();
        ReportRun {
            config: self.config,
            periods,
            table: aggregator.finish(),
            fetch_failures,
            summary,
        }
    }
}
