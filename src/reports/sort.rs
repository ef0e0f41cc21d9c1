//! Row ordering
//!
//! One sort policy is chosen per run and applied to every table and chart.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{AggregationTable, CategoryKey, Period, Scope};

/// Total order of report rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortPolicy {
    /// Lexicographic, ascending
    #[default]
    #[serde(rename = "name")]
    Name,
    /// Summed value over the report periods, descending; ties keep input order
    #[serde(rename = "total_cost", alias = "total_value")]
    TotalValue,
}

impl SortPolicy {
    /// Sort items by this policy
    ///
    /// `total` is only evaluated for [`SortPolicy::TotalValue`], once per item.
    pub fn sort<T, N, V>(&self, items: Vec<T>, name: N, total: V) -> Vec<T>
    where
        N: Fn(&T) -> &str,
        V: Fn(&T) -> f64,
    {
        match self {
            Self::Name => {
                let mut items = items;
                items.sort_by(|a, b| name(a).cmp(name(b)));
                items
            }
            Self::TotalValue => {
                let mut keyed: Vec<(T, f64)> = items
                    .into_iter()
                    .map(|item| {
                        let value = total(&item);
                        (item, value)
                    })
                    .collect();
                keyed.sort_by(|a, b| b.1.total_cmp(&a.1));
                keyed.into_iter().map(|(item, _)| item).collect()
            }
        }
    }

    /// Order categories, summing values over a scope
    pub fn order_categories(
        &self,
        table: &AggregationTable,
        categories: Vec<CategoryKey>,
        scope: Scope<'_>,
        periods: &[Period],
    ) -> Vec<CategoryKey> {
        self.sort(categories, |c| c.name(), |c| {
            table.category_total(scope, c, periods)
        })
    }

    /// Order accounts, summing every category of each account
    pub fn order_accounts(
        &self,
        table: &AggregationTable,
        accounts: &[String],
        periods: &[Period],
    ) -> Vec<String> {
        self.sort(accounts.to_vec(), |a| a.as_str(), |a| {
            table.total(Scope::Account(a), periods)
        })
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::TotalValue => write!(f, "total_cost"),
        }
    }
}
