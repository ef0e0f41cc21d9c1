//! Report period representation
//!
//! A period is one calendar bucket of the report window: a month or a day.
//! Every period has a canonical sort form ("2025-01", "2025-01-15") and a
//! display form derived from it ("January", "15/01").

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket size of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per day
    Daily,
    /// One bucket per calendar month (default)
    #[default]
    Monthly,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// Represents a report period
///
/// Periods of one run all share a granularity, so the derived ordering (which
/// compares the variant first) is chronological within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Period {
    /// Calendar month (e.g., "2025-01")
    Month { year: i32, month: u32 },

    /// Single day (e.g., "2025-01-15")
    Day(NaiveDate),
}

impl Period {
    /// Create a monthly period
    pub fn monthly(year: i32, month: u32) -> Self {
        Self::Month { year, month }
    }

    /// Create a daily period
    pub fn daily(date: NaiveDate) -> Self {
        Self::Day(date)
    }

    /// Get the period of the given granularity that contains a date
    pub fn containing(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Monthly => Self::Month {
                year: date.year(),
                month: date.month(),
            },
            Granularity::Daily => Self::Day(date),
        }
    }

    /// Get the granularity of this period
    pub fn granularity(&self) -> Granularity {
        match self {
            Self::Month { .. } => Granularity::Monthly,
            Self::Day(_) => Granularity::Daily,
        }
    }

    /// Get the first day of this period
    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Month { year, month } => NaiveDate::from_ymd_opt(*year, *month, 1),
            Self::Day(date) => Some(*date),
        }
    }

    /// Get the next period
    pub fn next(&self) -> Self {
        match self {
            Self::Month { year, month } => {
                if *month == 12 {
                    Self::Month {
                        year: *year + 1,
                        month: 1,
                    }
                } else {
                    Self::Month {
                        year: *year,
                        month: *month + 1,
                    }
                }
            }
            Self::Day(date) => Self::Day(*date + Duration::days(1)),
        }
    }

    /// Canonical sort form ("2025-01" or "2025-01-15")
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Display form ("January" for months, "15/01" for days)
    pub fn label(&self) -> String {
        match self {
            Self::Month { month, .. } => u8::try_from(*month)
                .ok()
                .and_then(|m| chrono::Month::try_from(m).ok())
                .map(|m| m.name().to_string())
                .unwrap_or_else(|| self.key()),
            Self::Day(date) => date.format("%d/%m").to_string(),
        }
    }

    /// Parse a raw period string against a granularity
    ///
    /// Formats:
    /// - Monthly: "2025-01", or a full date "2025-01-15" (truncated to its month)
    /// - Daily: "2025-01-15"
    pub fn parse(s: &str, granularity: Granularity) -> Result<Self, PeriodParseError> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(Self::containing(date, granularity));
        }

        if granularity == Granularity::Daily {
            return Err(PeriodParseError::InvalidFormat(s.to_string()));
        }

        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() == 2 {
            let year: i32 = parts[0]
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;
            let month: u32 = parts[1]
                .parse()
                .map_err(|_| PeriodParseError::InvalidFormat(s.to_string()))?;

            if !(1..=12).contains(&month) {
                return Err(PeriodParseError::InvalidMonth(month));
            }

            return Ok(Self::Month { year, month });
        }

        Err(PeriodParseError::InvalidFormat(s.to_string()))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            Self::Day(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    InvalidFormat(String),
    InvalidMonth(u32),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodParseError::InvalidFormat(s) => write!(f, "Invalid period format: {}", s),
            PeriodParseError::InvalidMonth(m) => write!(f, "Invalid month: {}", m),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_monthly_navigation() {
        let jan = Period::monthly(2025, 1);
        assert_eq!(jan.next(), Period::monthly(2025, 2));

        let dec = Period::monthly(2024, 12);
        assert_eq!(dec.next(), Period::monthly(2025, 1));
    }

    #[test]
    fn test_daily_navigation() {
        let last_of_feb = Period::daily(date(2024, 2, 29));
        assert_eq!(last_of_feb.next(), Period::daily(date(2024, 3, 1)));
    }

    #[test]
    fn test_key_and_label() {
        let month = Period::monthly(2024, 3);
        assert_eq!(month.key(), "2024-03");
        assert_eq!(month.label(), "March");

        let day = Period::daily(date(2024, 3, 7));
        assert_eq!(day.key(), "2024-03-07");
        assert_eq!(day.label(), "07/03");
    }

    #[test]
    fn test_parse_monthly() {
        assert_eq!(
            Period::parse("2025-01", Granularity::Monthly).unwrap(),
            Period::monthly(2025, 1)
        );
        // Cost providers report the bucket start date
        assert_eq!(
            Period::parse("2025-01-01", Granularity::Monthly).unwrap(),
            Period::monthly(2025, 1)
        );
        assert_eq!(
            Period::parse("2025-13", Granularity::Monthly),
            Err(PeriodParseError::InvalidMonth(13))
        );
    }

    #[test]
    fn test_parse_daily() {
        assert_eq!(
            Period::parse("2025-01-15", Granularity::Daily).unwrap(),
            Period::daily(date(2025, 1, 15))
        );
        assert!(Period::parse("2025-01", Granularity::Daily).is_err());
        assert!(Period::parse("yesterday", Granularity::Daily).is_err());
    }

    #[test]
    fn test_ordering() {
        let mut periods = vec![
            Period::monthly(2025, 1),
            Period::monthly(2024, 12),
            Period::monthly(2024, 2),
        ];
        periods.sort();
        let keys: Vec<String> = periods.iter().map(|p| p.key()).collect();
        assert_eq!(keys, vec!["2024-02", "2024-12", "2025-01"]);
    }

    #[test]
    fn test_granularity_serde() {
        let g: Granularity = serde_yaml::from_str("daily").unwrap();
        assert_eq!(g, Granularity::Daily);
        assert!(serde_yaml::from_str::<Granularity>("weekly").is_err());
    }
}
