//! Core data models for finops-report
//!
//! This module contains the data structures the report engine works on:
//! periods, categories, raw records, report kinds and the aggregation table.

pub mod category;
pub mod metric;
pub mod period;
pub mod record;
pub mod table;

pub use category::{CategoryFilter, CategoryKey, ExclusionRule, OTHER_LABEL, UNKNOWN_CATEGORY};
pub use metric::{format_count, format_currency, ReportKind};
pub use period::{Granularity, Period, PeriodParseError};
pub use record::RawRecord;
pub use table::{sum_values, AggregationTable, Scope};
