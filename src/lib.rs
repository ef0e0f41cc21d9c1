//! finops-report - multi-account cost and findings reports
//!
//! This library aggregates raw per-account records (billing costs or security
//! finding counts) into period-by-category tables and renders them as
//! markdown tables or a self-contained interactive HTML page.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: YAML report configuration
//! - `error`: Custom error types
//! - `models`: Periods, categories, raw records and the aggregation table
//! - `services`: Period generation, fetching, aggregation and the report run
//! - `reports`: Sorted report tables and chart datasets
//! - `display`: Markdown and HTML documents
//! - `export`: CSV export
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use finops_report::config::ReportConfig;
//! use finops_report::services::{CsvDirectoryFetcher, ReportService};
//!
//! let config = ReportConfig::load(Path::new("report.yaml"))?;
//! let fetcher = CsvDirectoryFetcher::new("data");
//! let run = ReportService::new(&config).run(&fetcher);
//! for document in run.render()? {
//!     println!("{}", document.content);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;

pub use error::{ReportError, ReportResult};
