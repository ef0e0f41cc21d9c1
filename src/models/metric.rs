//! Report kinds and metric formatting
//!
//! A cost report and a findings dashboard share the same engine. They differ
//! only in labels and in how a metric value is printed.

use num_format::{Locale, ToFormattedString};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the metric values of a report measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// Billing costs in dollars (default)
    #[default]
    Cost,
    /// Security finding counts by severity
    Findings,
}

impl ReportKind {
    /// Format a metric value for display
    pub fn format_value(&self, value: f64) -> String {
        match self {
            Self::Cost => format_currency(value),
            Self::Findings => format_count(value),
        }
    }

    /// Format a metric value without decoration (for CSV export)
    pub fn format_plain(&self, value: f64) -> String {
        match self {
            Self::Cost => format!("{:.2}", value),
            Self::Findings => format!("{}", value.round() as i64),
        }
    }

    /// Header of the first column in category tables
    pub fn category_header(&self) -> &'static str {
        match self {
            Self::Cost => "Service",
            Self::Findings => "Severity",
        }
    }

    /// Noun used in section headings ("Cost", "Findings")
    pub fn metric_noun(&self) -> &'static str {
        match self {
            Self::Cost => "Cost",
            Self::Findings => "Findings",
        }
    }

    /// Plural category noun used in section headings
    pub fn category_noun(&self) -> &'static str {
        match self {
            Self::Cost => "service",
            Self::Findings => "severity",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cost => write!(f, "cost"),
            Self::Findings => write!(f, "findings"),
        }
    }
}

/// Format an amount as "$ #,##0.00"
pub fn format_currency(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!(
        "{}$ {}.{:02}",
        sign,
        (cents / 100).to_formatted_string(&Locale::en),
        cents % 100
    )
}

/// Format a count as a plain integer
pub fn format_count(count: f64) -> String {
    format!("{}", count.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$ 0.00");
        assert_eq!(format_currency(15.0), "$ 15.00");
        assert_eq!(format_currency(1234.5), "$ 1,234.50");
        assert_eq!(format_currency(1234567.891), "$ 1,234,567.89");
        assert_eq!(format_currency(0.005), "$ 0.01");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(12345.0), "12345");
    }

    #[test]
    fn test_kind_formatting() {
        assert_eq!(ReportKind::Cost.format_value(2.5), "$ 2.50");
        assert_eq!(ReportKind::Findings.format_value(7.0), "7");
        assert_eq!(ReportKind::Cost.format_plain(2.5), "2.50");
        assert_eq!(ReportKind::Findings.format_plain(7.0), "7");
    }

    #[test]
    fn test_labels() {
        assert_eq!(ReportKind::Cost.category_header(), "Service");
        assert_eq!(ReportKind::Findings.category_header(), "Severity");
    }
}
