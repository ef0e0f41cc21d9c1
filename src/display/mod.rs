//! Report rendering
//!
//! Both document encodings read the same [`TableCells`], derived once per
//! table, so they agree on row order, column order and formatted values.

pub mod html;
pub mod markdown;

pub use html::{escape_html, render_html, HtmlDocument};
pub use markdown::{render_markdown, render_markdown_table};

use crate::models::ReportKind;
use crate::reports::{ReportTable, TableShape};

/// Formatted cells of one report table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCells {
    /// Label column header, then one header per period, then "Total"
    pub headers: Vec<String>,
    /// One line per row, label first
    pub rows: Vec<Vec<String>>,
    /// The total line, label first
    pub total: Vec<String>,
}

impl TableCells {
    /// Format a report table
    pub fn from_table(table: &ReportTable, kind: ReportKind) -> Self {
        let line = |label: &str, cells: &[f64], total: f64| {
            std::iter::once(label.to_string())
                .chain(cells.iter().map(|v| kind.format_value(*v)))
                .chain(std::iter::once(kind.format_value(total)))
                .collect::<Vec<_>>()
        };

        let headers = std::iter::once(table.row_header.clone())
            .chain(table.column_labels())
            .collect();

        let rows = table
            .rows
            .iter()
            .map(|row| line(&row.label, &row.cells, row.total))
            .collect();

        let total = line(
            &table.total_row.label,
            &table.total_row.cells,
            table.total_row.total,
        );

        Self {
            headers,
            rows,
            total,
        }
    }

    /// Formatted grand total (bottom-right cell)
    pub fn grand_total(&self) -> &str {
        self.total.last().map(String::as_str).unwrap_or_default()
    }
}

/// Heading of a report section
pub fn section_title(shape: &TableShape, kind: ReportKind) -> String {
    match shape {
        TableShape::Account(account) => format!(
            "{} per {} for account - {}",
            kind.metric_noun(),
            kind.category_noun(),
            account
        ),
        TableShape::AccountTotals => format!("{} total per account", kind.metric_noun()),
        TableShape::CategoryTotals => format!(
            "{} total per {}",
            kind.metric_noun(),
            kind.category_noun()
        ),
    }
}
