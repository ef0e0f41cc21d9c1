//! Data fetchers
//!
//! A fetcher yields the raw records of one account. The report pipeline calls
//! it once per configured account and never retries: a failed fetch simply
//! means that account contributes nothing.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use csv::{Reader, StringRecord};
use tracing::warn;

use crate::error::{ReportError, ReportResult};
use crate::models::RawRecord;

/// Source of raw records, one account at a time
pub trait DataFetcher {
    /// Fetch every raw record of an account
    fn fetch(&self, account: &str) -> ReportResult<Vec<RawRecord>>;
}

/// Column positions of the fields a record needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    /// Index of the category column
    pub category_column: usize,
    /// Index of the period column
    pub period_column: usize,
    /// Index of the amount column
    pub amount_column: usize,
}

impl ColumnMapping {
    /// Locate the columns by header name (case-insensitive, extra columns ignored)
    pub fn from_headers(headers: &StringRecord) -> Result<Self, String> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| format!("missing '{}' column", name))
        };

        Ok(Self {
            category_column: find("category")?,
            period_column: find("period")?,
            amount_column: find("amount")?,
        })
    }
}

/// Reads `<dir>/<account>.csv` files with `category,period,amount` columns
#[derive(Debug, Clone)]
pub struct CsvDirectoryFetcher {
    dir: PathBuf,
}

impl CsvDirectoryFetcher {
    /// Create a fetcher over a directory of per-account CSV files
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the CSV file holding an account's records
    pub fn path_for(&self, account: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", account))
    }

    /// Parse CSV rows into raw records for an account
    ///
    /// Unreadable rows are skipped. An amount that does not parse is passed
    /// on as missing so the aggregator rejects that record alone.
    pub fn parse_csv_from_reader<R: Read>(
        account: &str,
        reader: &mut Reader<R>,
    ) -> ReportResult<Vec<RawRecord>> {
        let headers = reader
            .headers()
            .map_err(|e| ReportError::fetch_failed(account, e.to_string()))?
            .clone();
        let mapping = ColumnMapping::from_headers(&headers)
            .map_err(|e| ReportError::fetch_failed(account, e))?;

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    warn!(account, row = idx + 1, error = %e, "Skipping unreadable CSV row");
                    continue;
                }
            };
            records.push(Self::parse_record(account, &row, idx, &mapping));
        }

        Ok(records)
    }

    fn parse_record(
        account: &str,
        row: &StringRecord,
        row_number: usize,
        mapping: &ColumnMapping,
    ) -> RawRecord {
        let field = |col: usize| {
            row.get(col)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        let amount = field(mapping.amount_column).and_then(|raw| {
            match parse_amount_string(&raw) {
                Some(amount) => Some(amount),
                None => {
                    warn!(account, row = row_number + 1, value = %raw, "Invalid amount");
                    None
                }
            }
        });

        RawRecord {
            account: Some(account.to_string()),
            category: field(mapping.category_column),
            period: field(mapping.period_column),
            amount,
        }
    }
}

/// Parse an amount such as "1234.5", "$1,234.50" or "$ 12"
fn parse_amount_string(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    cleaned.parse::<f64>().ok()
}

impl DataFetcher for CsvDirectoryFetcher {
    fn fetch(&self, account: &str) -> ReportResult<Vec<RawRecord>> {
        let path = self.path_for(account);
        let file = File::open(&path).map_err(|e| {
            ReportError::fetch_failed(account, format!("{}: {}", path.display(), e))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        Self::parse_csv_from_reader(account, &mut reader)
    }
}

/// In-memory fetcher, mainly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    records: HashMap<String, Vec<RawRecord>>,
    failing: HashSet<String>,
}

impl StaticFetcher {
    /// Create an empty fetcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these records for an account
    pub fn with_records(mut self, account: impl Into<String>, records: Vec<RawRecord>) -> Self {
        self.records.entry(account.into()).or_default().extend(records);
        self
    }

    /// Make fetching an account fail
    pub fn with_failure(mut self, account: impl Into<String>) -> Self {
        self.failing.insert(account.into());
        self
    }
}

impl DataFetcher for StaticFetcher {
    fn fetch(&self, account: &str) -> ReportResult<Vec<RawRecord>> {
        if self.failing.contains(account) {
            return Err(ReportError::fetch_failed(account, "simulated failure"));
        }
        Ok(self.records.get(account).cloned().unwrap_or_default())
    }
}
