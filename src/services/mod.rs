//! Service layer
//!
//! The service layer turns a validated configuration into a finished report:
//! period generation, fetching, aggregation and the end-to-end run.

pub mod aggregator;
pub mod fetcher;
pub mod period;
pub mod report;

pub use aggregator::{Aggregator, Contribution, IngestSummary};
pub use fetcher::{ColumnMapping, CsvDirectoryFetcher, DataFetcher, StaticFetcher};
pub use period::{generate_periods, PeriodService};
pub use report::{DocumentFormat, RenderedDocument, ReportRun, ReportService};
