//! Aggregator service
//!
//! Folds raw records into the per-run [`AggregationTable`], applying the
//! exclusion rules, the category allow-list and the Other bucket. A bad
//! record is rejected on its own and never disturbs the rest of the run.

use tracing::{debug, warn};

use crate::config::ReportConfig;
use crate::error::{ReportError, ReportResult};
use crate::models::{
    AggregationTable, CategoryFilter, CategoryKey, ExclusionRule, Granularity, Period, RawRecord,
    UNKNOWN_CATEGORY,
};

/// What happened to one accepted record
#[derive(Debug, Clone, PartialEq)]
pub enum Contribution {
    /// Added to this category's cell
    Kept(CategoryKey),
    /// Dropped by an exclusion rule; contributes to nothing
    Excluded(ExclusionRule),
}

/// Counts of record outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Records added under their own category
    pub accepted: usize,
    /// Records folded into the Other bucket
    pub folded: usize,
    /// Records dropped by an exclusion rule
    pub excluded: usize,
    /// Malformed records that were skipped
    pub rejected: usize,
}

impl IngestSummary {
    /// Total number of records seen
    pub fn seen(&self) -> usize {
        self.accepted + self.folded + self.excluded + self.rejected
    }

    fn since(&self, earlier: IngestSummary) -> IngestSummary {
        IngestSummary {
            accepted: self.accepted - earlier.accepted,
            folded: self.folded - earlier.folded,
            excluded: self.excluded - earlier.excluded,
            rejected: self.rejected - earlier.rejected,
        }
    }
}

/// Builds one aggregation table per run
pub struct Aggregator {
    table: AggregationTable,
    filter: CategoryFilter,
    exclusions: Vec<ExclusionRule>,
    granularity: Granularity,
    summary: IngestSummary,
}

impl Aggregator {
    /// Create an aggregator for the given accounts and rules
    pub fn new(
        accounts: Vec<String>,
        filter: CategoryFilter,
        exclusions: Vec<ExclusionRule>,
        granularity: Granularity,
    ) -> Self {
        Self {
            table: AggregationTable::new(accounts),
            filter,
            exclusions,
            granularity,
            summary: IngestSummary::default(),
        }
    }

    /// Create an aggregator from a validated configuration
    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(
            config.profiles.clone(),
            config.category_filter(),
            config.exclusions(),
            config.period,
        )
    }

    /// Fold a single record into the table
    pub fn ingest(&mut self, record: &RawRecord) -> ReportResult<Contribution> {
        let outcome = self.fold(record);
        match &outcome {
            Ok(Contribution::Kept(CategoryKey::Other)) => self.summary.folded += 1,
            Ok(Contribution::Kept(_)) => self.summary.accepted += 1,
            Ok(Contribution::Excluded(_)) => self.summary.excluded += 1,
            Err(_) => self.summary.rejected += 1,
        }
        outcome
    }

    /// Fold a batch of records, logging and skipping malformed ones
    pub fn ingest_all<I>(&mut self, records: I) -> IngestSummary
    where
        I: IntoIterator<Item = RawRecord>,
    {
        let before = self.summary;

        for record in records {
            match self.ingest(&record) {
                Ok(Contribution::Excluded(rule)) => {
                    debug!(
                        category = record.category.as_deref().unwrap_or(UNKNOWN_CATEGORY),
                        rule = %rule,
                        "Excluded record"
                    );
                }
                Ok(Contribution::Kept(_)) => {}
                Err(e) => warn!(error = %e, "Skipping record"),
            }
        }

        self.summary.since(before)
    }

    fn fold(&mut self, record: &RawRecord) -> ReportResult<Contribution> {
        let account_name = record
            .account
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| ReportError::invalid_record("missing account"))?;

        let account = self.table.account_index(account_name).ok_or_else(|| {
            ReportError::invalid_record(format!("account '{}' is not configured", account_name))
        })?;

        let raw_period = record
            .period
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ReportError::invalid_record("missing period"))?;

        let period = Period::parse(raw_period, self.granularity)
            .map_err(|e| ReportError::invalid_record(e.to_string()))?;

        let amount = record
            .amount
            .ok_or_else(|| ReportError::invalid_record("missing amount"))?;

        if !amount.is_finite() || amount < 0.0 {
            return Err(ReportError::invalid_record(format!(
                "amount must be a non-negative number, got {}",
                amount
            )));
        }

        let category = record
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_CATEGORY);

        if let Some(rule) = ExclusionRule::first_match(&self.exclusions, category) {
            return Ok(Contribution::Excluded(rule));
        }

        let key = self.filter.resolve(category);
        self.table.add(account, key.clone(), period, amount);

        Ok(Contribution::Kept(key))
    }

    /// Outcome counts so far
    pub fn summary(&self) -> IngestSummary {
        self.summary
    }

    /// Finish the run and hand out the immutable table
    pub fn finish(self) -> AggregationTable {
        self.table
    }
}
