//! Custom error types for finops-report
//!
//! This module defines the error hierarchy for the report engine using
//! thiserror for ergonomic error definitions.
//!
//! Only configuration problems abort a run. Fetch failures are scoped to one
//! account and record failures to one record; both are logged and skipped.

use thiserror::Error;

/// The main error type for report operations
#[derive(Error, Debug)]
pub enum ReportError {
    /// Configuration-related errors (fatal, raised before any fetch)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Fetching records for one account failed
    #[error("Failed to fetch records for account '{account}': {reason}")]
    Fetch { account: String, reason: String },

    /// A single raw record was malformed
    #[error("Invalid record: {0}")]
    Record(String),

    /// A document could not be rendered
    #[error("Render error: {0}")]
    Render(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl ReportError {
    /// Create a fetch error for an account
    pub fn fetch_failed(account: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Fetch {
            account: account.into(),
            reason: reason.into(),
        }
    }

    /// Create a record error
    pub fn invalid_record(reason: impl Into<String>) -> Self {
        Self::Record(reason.into())
    }

    /// Whether this error must abort the run
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Fetch { .. } | Self::Record(_))
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for report operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
        assert!(err.is_config());
    }

    #[test]
    fn test_fetch_error() {
        let err = ReportError::fetch_failed("prod", "file not found");
        assert_eq!(
            err.to_string(),
            "Failed to fetch records for account 'prod': file not found"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatality() {
        assert!(ReportError::Config("x".into()).is_fatal());
        assert!(ReportError::Io("x".into()).is_fatal());
        assert!(ReportError::Render("x".into()).is_fatal());
        assert!(!ReportError::invalid_record("x").is_fatal());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReportError = io_err.into();
        assert!(matches!(err, ReportError::Io(_)));
    }
}
