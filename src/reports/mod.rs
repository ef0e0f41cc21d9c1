//! Reports module
//!
//! Turns a finished aggregation table into ordered report tables and their
//! chart datasets. Everything here is a pure function of the table.

pub mod chart;
pub mod sort;
pub mod table;

pub use chart::{
    color_for, severity_color, ChartData, ChartDataBuilder, ProportionSlice, StackedSeries, PALETTE,
    SEVERITY_COLORS,
};
pub use sort::SortPolicy;
pub use table::{entity_series, ReportRow, ReportTable, RowKey, TableBuilder, TableShape, TOTAL_LABEL};

use crate::models::{AggregationTable, CategoryFilter, Period, ReportKind};

/// A table together with the charts drawn from it
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub table: ReportTable,
    pub chart: ChartData,
}

/// Every table of a report, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSet {
    /// What the values measure
    pub kind: ReportKind,
    /// One section per configured account, in configured order
    pub accounts: Vec<ReportSection>,
    /// Totals per account
    pub account_totals: ReportSection,
    /// Totals per category across accounts
    pub category_totals: ReportSection,
}

impl ReportSet {
    /// Build all tables and charts of a report
    pub fn build(
        table: &AggregationTable,
        periods: &[Period],
        filter: &CategoryFilter,
        sort: SortPolicy,
        kind: ReportKind,
    ) -> Self {
        let tables = TableBuilder::new(table, periods, filter, sort, kind);
        let charts = ChartDataBuilder::new(table, periods, kind);

        let section = |report: ReportTable| ReportSection {
            chart: charts.for_table(&report),
            table: report,
        };

        Self {
            kind,
            accounts: table
                .accounts()
                .iter()
                .map(|account| section(tables.account_table(account)))
                .collect(),
            account_totals: section(tables.account_totals_table()),
            category_totals: section(tables.category_table()),
        }
    }

    /// All sections in document order
    pub fn sections(&self) -> impl Iterator<Item = &ReportSection> {
        self.accounts
            .iter()
            .chain(std::iter::once(&self.account_totals))
            .chain(std::iter::once(&self.category_totals))
    }

    /// Grand total across every account
    pub fn grand_total(&self) -> f64 {
        self.account_totals.table.grand_total()
    }
}
