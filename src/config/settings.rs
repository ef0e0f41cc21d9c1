//! Report configuration
//!
//! A report run is described by one YAML file. Loading validates everything
//! up front: a configuration problem is the only error that aborts a run,
//! and it must surface before any record is fetched.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::models::{CategoryFilter, ExclusionRule, Granularity, ReportKind, OTHER_LABEL};
use crate::reports::SortPolicy;

/// Which documents a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Pipe-delimited markdown tables
    #[serde(alias = "tabular")]
    Markdown,
    /// Styled HTML document with charts
    #[serde(alias = "interactive")]
    Html,
    /// Both documents
    Both,
}

impl ReportFormat {
    /// Whether a markdown document is requested
    pub fn wants_markdown(&self) -> bool {
        matches!(self, Self::Markdown | Self::Both)
    }

    /// Whether an HTML document is requested
    pub fn wants_html(&self) -> bool {
        matches!(self, Self::Html | Self::Both)
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// Configuration of one report run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report title, also used for output file names
    pub report_name: String,

    /// What the metric values measure
    #[serde(default)]
    pub report_kind: ReportKind,

    /// Documents to produce
    pub report_format: ReportFormat,

    /// Row order of every table
    pub sort_by: SortPolicy,

    /// Accounts, fetched and listed in this order
    #[serde(alias = "accounts")]
    pub profiles: Vec<String>,

    /// Category allow-list (empty = report every category)
    #[serde(alias = "categories")]
    pub services: Vec<String>,

    /// First day of the report window
    #[serde(with = "ymd")]
    pub start_date: NaiveDate,

    /// Day after the report window (exclusive)
    #[serde(with = "ymd")]
    pub end_date: NaiveDate,

    /// Bucket size
    pub period: Granularity,

    /// Drop the "Tax" service
    pub exclude_taxes: bool,

    /// Drop "AWS Support (...)" services
    pub exclude_support: bool,

    /// Drop INFORMATIONAL findings
    #[serde(default)]
    pub exclude_informational: bool,
}

mod ymd {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(s.trim(), FORMAT).map_err(|_| {
            de::Error::custom(format!("invalid date '{}', dates must be in YYYY-MM-DD format", s))
        })
    }
}

impl ReportConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> ReportResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Config(format!(
                "Failed to read configuration file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Parse and validate a configuration from YAML text
    pub fn from_yaml_str(contents: &str) -> ReportResult<Self> {
        let config: ReportConfig = serde_yaml::from_str(contents)
            .map_err(|e| ReportError::Config(format!("Failed to parse configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check the semantic constraints serde cannot express
    pub fn validate(&self) -> ReportResult<()> {
        if self.report_name.trim().is_empty() {
            return Err(ReportError::Config("'report_name' must not be empty".into()));
        }

        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if profile.trim().is_empty() {
                return Err(ReportError::Config(
                    "'profiles' must not contain empty names".into(),
                ));
            }
            if !seen.insert(profile.as_str()) {
                return Err(ReportError::Config(format!(
                    "Duplicate profile '{}' in 'profiles'",
                    profile
                )));
            }
        }

        if self.services.iter().any(|s| s.trim().is_empty()) {
            return Err(ReportError::Config(
                "'services' must not contain empty names".into(),
            ));
        }
        if self.services.iter().any(|s| s.trim() == OTHER_LABEL) {
            return Err(ReportError::Config(format!(
                "'services' must not list '{}'; unlisted categories are grouped under it",
                OTHER_LABEL
            )));
        }

        if self.start_date >= self.end_date {
            tracing::warn!(
                start = %self.start_date,
                end = %self.end_date,
                "Report window is empty; tables will only carry a Total column"
            );
        }

        Ok(())
    }

    /// The configured category allow-list
    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter::new(self.services.clone())
    }

    /// Exclusion rules enabled by the configuration flags
    pub fn exclusions(&self) -> Vec<ExclusionRule> {
        let mut rules = Vec::new();
        if self.exclude_taxes {
            rules.push(ExclusionRule::Tax);
        }
        if self.exclude_support {
            rules.push(ExclusionRule::Support);
        }
        if self.exclude_informational {
            rules.push(ExclusionRule::Informational);
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
report_name: monthly-costs
report_format: both
sort_by: total_cost
profiles: [prod, staging]
services: [EC2, S3]
start_date: "2024-01-01"
end_date: "2024-03-01"
period: monthly
exclude_taxes: true
exclude_support: false
"#;

    #[test]
    fn test_parse_sample() {
        let config = ReportConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.report_name, "monthly-costs");
        assert_eq!(config.report_kind, ReportKind::Cost);
        assert_eq!(config.report_format, ReportFormat::Both);
        assert_eq!(config.sort_by, SortPolicy::TotalValue);
        assert_eq!(config.profiles, vec!["prod", "staging"]);
        assert_eq!(config.period, Granularity::Monthly);
        assert_eq!(
            config.start_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(config.exclusions(), vec![ExclusionRule::Tax]);
        assert!(config.category_filter().allows("S3"));
    }

    #[test]
    fn test_aliases() {
        let yaml = SAMPLE
            .replace("report_format: both", "report_format: interactive")
            .replace("sort_by: total_cost", "sort_by: total_value")
            .replace("profiles:", "accounts:")
            .replace("services:", "categories:");
        let config = ReportConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.report_format, ReportFormat::Html);
        assert_eq!(config.sort_by, SortPolicy::TotalValue);
        assert_eq!(config.profiles.len(), 2);
    }

    #[test]
    fn test_missing_field() {
        let yaml = SAMPLE.replace("exclude_support: false\n", "");
        let err = ReportConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("exclude_support"));
    }

    #[test]
    fn test_invalid_enum() {
        let yaml = SAMPLE.replace("period: monthly", "period: weekly");
        assert!(ReportConfig::from_yaml_str(&yaml).unwrap_err().is_config());

        let yaml = SAMPLE.replace("sort_by: total_cost", "sort_by: random");
        assert!(ReportConfig::from_yaml_str(&yaml).unwrap_err().is_config());
    }

    #[test]
    fn test_invalid_date() {
        let yaml = SAMPLE.replace("\"2024-03-01\"", "\"03/01/2024\"");
        let err = ReportConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn test_duplicate_profile() {
        let yaml = SAMPLE.replace("[prod, staging]", "[prod, prod]");
        let err = ReportConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(err.to_string().contains("Duplicate profile"));
    }

    #[test]
    fn test_other_cannot_be_listed() {
        let yaml = SAMPLE.replace("services: [EC2, S3]", "services: [EC2, Other]");
        let err = ReportConfig::from_yaml_str(&yaml).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("'Other'"));
    }

    #[test]
    fn test_empty_window_is_valid() {
        let yaml = SAMPLE.replace("\"2024-03-01\"", "\"2024-01-01\"");
        assert!(ReportConfig::from_yaml_str(&yaml).is_ok());
    }

    #[test]
    fn test_findings_kind() {
        let yaml = format!("{}report_kind: findings\nexclude_informational: true\n", SAMPLE);
        let config = ReportConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.report_kind, ReportKind::Findings);
        assert!(config.exclusions().contains(&ExclusionRule::Informational));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = ReportConfig::load(&path).unwrap();
        assert_eq!(config.profiles.len(), 2);

        let missing = ReportConfig::load(&temp_dir.path().join("missing.yaml"));
        assert!(missing.unwrap_err().is_config());
    }
}
