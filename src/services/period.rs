//! Report period service
//!
//! Builds the ordered set of buckets covering a report window.

use chrono::NaiveDate;

use crate::config::ReportConfig;
use crate::models::{Granularity, Period};

/// Generate the periods covering `[start, end)`
///
/// Monthly periods start with the month containing `start`. An empty or
/// inverted window yields no periods.
pub fn generate_periods(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut current = Period::containing(start, granularity);

    while let Some(first_day) = current.start_date() {
        if first_day >= end {
            break;
        }
        periods.push(current);
        current = current.next();
    }

    periods
}

/// Service for report period management
pub struct PeriodService<'a> {
    config: &'a ReportConfig,
}

impl<'a> PeriodService<'a> {
    /// Create a new period service
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Get every period of the report window, in order
    pub fn periods(&self) -> Vec<Period> {
        generate_periods(self.config.start_date, self.config.end_date, self.config.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn keys(periods: &[Period]) -> Vec<String> {
        periods.iter().map(|p| p.key()).collect()
    }

    #[test]
    fn test_empty_window() {
        let periods = generate_periods(date("2024-01-01"), date("2024-01-01"), Granularity::Daily);
        assert!(periods.is_empty());

        let inverted = generate_periods(date("2024-02-01"), date("2024-01-01"), Granularity::Monthly);
        assert!(inverted.is_empty());
    }

    #[test]
    fn test_daily_periods() {
        let periods = generate_periods(date("2024-01-01"), date("2024-01-04"), Granularity::Daily);
        assert_eq!(keys(&periods), vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn test_monthly_periods() {
        let periods = generate_periods(date("2024-01-15"), date("2024-03-01"), Granularity::Monthly);
        assert_eq!(keys(&periods), vec!["2024-01", "2024-02"]);
    }

    #[test]
    fn test_monthly_year_rollover() {
        let periods = generate_periods(date("2023-11-01"), date("2024-02-10"), Granularity::Monthly);
        assert_eq!(keys(&periods), vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
        let labels: Vec<String> = periods.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["November", "December", "January", "February"]);
    }

    #[test]
    fn test_daily_across_month_end() {
        let periods = generate_periods(date("2024-02-28"), date("2024-03-02"), Granularity::Daily);
        assert_eq!(keys(&periods), vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
    }

    #[test]
    fn test_service_periods() {
        let config = crate::config::ReportConfig::from_yaml_str(
            r#"
report_name: r
report_format: markdown
sort_by: name
profiles: [a]
services: []
start_date: "2024-01-01"
end_date: "2024-01-03"
period: daily
exclude_taxes: false
exclude_support: false
"#,
        )
        .unwrap();
        let service = PeriodService::new(&config);

        assert_eq!(keys(&service.periods()), vec!["2024-01-01", "2024-01-02"]);
    }
}
