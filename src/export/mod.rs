//! Export module
//!
//! Machine-readable exports of a built report.

pub mod csv;

pub use csv::export_report_csv;
