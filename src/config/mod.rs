//! Configuration module for finops-report
//!
//! This module provides loading and validation of report configuration files.

pub mod settings;

pub use settings::{ReportConfig, ReportFormat};
