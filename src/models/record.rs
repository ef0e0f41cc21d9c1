//! Raw metric records as handed over by a data fetcher
//!
//! Every field is optional: fetchers pass through whatever the provider
//! returned and the aggregator decides what is usable.

use serde::{Deserialize, Serialize};

/// One raw record: an amount for an account, category and period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Account the amount belongs to
    #[serde(default)]
    pub account: Option<String>,

    /// Service name or finding severity
    #[serde(default)]
    pub category: Option<String>,

    /// Raw period string ("2025-01" or "2025-01-15")
    #[serde(default)]
    pub period: Option<String>,

    /// Cost or finding count
    #[serde(default)]
    pub amount: Option<f64>,
}

impl RawRecord {
    /// Create a fully populated record
    pub fn new(
        account: impl Into<String>,
        category: impl Into<String>,
        period: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            account: Some(account.into()),
            category: Some(category.into()),
            period: Some(period.into()),
            amount: Some(amount),
        }
    }

    /// Set the account, keeping any other fields
    pub fn with_account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }
}
