//! Aggregation table
//!
//! Sparse account x category x period table built once per run. Accounts and
//! categories live in small arenas and cells are keyed by their indices, so
//! any axis can be summed without rebuilding nested maps.

use std::collections::{HashMap, HashSet};

use super::category::CategoryKey;
use super::period::Period;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellKey {
    account: usize,
    category: usize,
    period: Period,
}

/// Which accounts a sum runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// A single account
    Account(&'a str),
    /// Every configured account
    AllAccounts,
}

/// The per-run accumulation of metric values
///
/// Absent cells read as zero. Only the aggregator writes to a table; once
/// handed out it is read-only.
#[derive(Debug, Clone, Default)]
pub struct AggregationTable {
    accounts: Vec<String>,
    categories: Vec<CategoryKey>,
    cells: HashMap<CellKey, f64>,
}

impl AggregationTable {
    /// Create an empty table for the configured accounts
    pub fn new(accounts: Vec<String>) -> Self {
        Self {
            accounts,
            categories: Vec::new(),
            cells: HashMap::new(),
        }
    }

    /// Add an amount into a cell
    pub(crate) fn add(
        &mut self,
        account: usize,
        category: CategoryKey,
        period: Period,
        amount: f64,
    ) {
        let category = match self.category_index(&category) {
            Some(idx) => idx,
            None => {
                self.categories.push(category);
                self.categories.len() - 1
            }
        };

        *self
            .cells
            .entry(CellKey {
                account,
                category,
                period,
            })
            .or_insert(0.0) += amount;
    }

    /// Configured accounts, in configured order
    pub fn accounts(&self) -> &[String] {
        &self.accounts
    }

    /// Every category encountered, in first-seen order
    pub fn categories(&self) -> &[CategoryKey] {
        &self.categories
    }

    /// Position of an account in the configured order
    pub fn account_index(&self, account: &str) -> Option<usize> {
        self.accounts.iter().position(|a| a == account)
    }

    fn category_index(&self, category: &CategoryKey) -> Option<usize> {
        self.categories.iter().position(|c| c == category)
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if nothing was aggregated
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if a category has at least one cell
    pub fn contains_category(&self, category: &CategoryKey) -> bool {
        self.category_index(category).is_some()
    }

    /// Categories with at least one cell under an account, in first-seen order
    pub fn categories_for(&self, account: &str) -> Vec<&CategoryKey> {
        let Some(account) = self.account_index(account) else {
            return Vec::new();
        };

        let present: HashSet<usize> = self
            .cells
            .keys()
            .filter(|key| key.account == account)
            .map(|key| key.category)
            .collect();

        self.categories
            .iter()
            .enumerate()
            .filter(|(idx, _)| present.contains(idx))
            .map(|(_, category)| category)
            .collect()
    }

    /// Value of a single cell
    pub fn get(&self, account: &str, category: &CategoryKey, period: Period) -> f64 {
        match (self.account_index(account), self.category_index(category)) {
            (Some(account), Some(category)) => self.cell(account, category, period),
            _ => 0.0,
        }
    }

    fn cell(&self, account: usize, category: usize, period: Period) -> f64 {
        self.cells
            .get(&CellKey {
                account,
                category,
                period,
            })
            .copied()
            .unwrap_or(0.0)
    }

    fn account_indices(&self, scope: Scope<'_>) -> Vec<usize> {
        match scope {
            Scope::Account(account) => self.account_index(account).into_iter().collect(),
            Scope::AllAccounts => (0..self.accounts.len()).collect(),
        }
    }

    /// Value of one category in one period, summed over a scope
    pub fn value(&self, scope: Scope<'_>, category: &CategoryKey, period: Period) -> f64 {
        let Some(category) = self.category_index(category) else {
            return 0.0;
        };
        sum_values(
            self.account_indices(scope)
                .into_iter()
                .map(|account| self.cell(account, category, period)),
        )
    }

    /// Value of one category summed over periods and a scope
    pub fn category_total(
        &self,
        scope: Scope<'_>,
        category: &CategoryKey,
        periods: &[Period],
    ) -> f64 {
        sum_values(periods.iter().map(|period| self.value(scope, category, *period)))
    }

    /// Sum of every category in one period over a scope
    pub fn period_total(&self, scope: Scope<'_>, period: Period) -> f64 {
        let accounts = self.account_indices(scope);
        let mut total = 0.0;
        for account in accounts {
            for category in 0..self.categories.len() {
                total += self.cell(account, category, period);
            }
        }
        total
    }

    /// Sum of every category over periods and a scope
    pub fn total(&self, scope: Scope<'_>, periods: &[Period]) -> f64 {
        sum_values(periods.iter().map(|period| self.period_total(scope, *period)))
    }
}

/// Sum metric values; an empty sum is `+0.0`
pub fn sum_values<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    values.into_iter().fold(0.0, |acc, v| acc + v)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan() -> Period {
        Period::monthly(2024, 1)
    }

    fn feb() -> Period {
        Period::monthly(2024, 2)
    }

    fn sample() -> AggregationTable {
        let mut table = AggregationTable::new(vec!["a".into(), "b".into()]);
        table.add(0, CategoryKey::explicit("EC2"), jan(), 10.0);
        table.add(0, CategoryKey::explicit("EC2"), jan(), 5.0);
        table.add(0, CategoryKey::Other, feb(), 2.0);
        table.add(1, CategoryKey::explicit("S3"), jan(), 4.0);
        table
    }

    #[test]
    fn test_additive_cells() {
        let table = sample();
        assert_eq!(table.get("a", &CategoryKey::explicit("EC2"), jan()), 15.0);
        assert_eq!(table.get("a", &CategoryKey::explicit("EC2"), feb()), 0.0);
        assert_eq!(table.get("missing", &CategoryKey::explicit("EC2"), jan()), 0.0);
        assert_eq!(table.cell_count(), 3);
    }

    #[test]
    fn test_category_arena_order() {
        let table = sample();
        let names: Vec<&str> = table.categories().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["EC2", "Other", "S3"]);

        let for_b: Vec<&str> = table.categories_for("b").iter().map(|c| c.name()).collect();
        assert_eq!(for_b, vec!["S3"]);
    }

    #[test]
    fn test_axis_sums() {
        let table = sample();
        let periods = [jan(), feb()];

        assert_eq!(table.period_total(Scope::Account("a"), jan()), 15.0);
        assert_eq!(table.period_total(Scope::AllAccounts, jan()), 19.0);
        assert_eq!(table.total(Scope::Account("a"), &periods), 17.0);
        assert_eq!(table.total(Scope::AllAccounts, &periods), 21.0);
        assert_eq!(
            table.category_total(Scope::AllAccounts, &CategoryKey::Other, &periods),
            2.0
        );
    }

    #[test]
    fn test_empty_sums_are_positive_zero() {
        let table = sample();
        let total = table.total(Scope::AllAccounts, &[]);
        assert_eq!(total, 0.0);
        assert!(total.is_sign_positive());
        assert!(sum_values(Vec::new()).is_sign_positive());
        assert!(table
            .category_total(Scope::Account("a"), &CategoryKey::Other, &[])
            .is_sign_positive());
    }

    #[test]
    fn test_empty_table() {
        let table = AggregationTable::new(vec!["a".into()]);
        assert!(table.is_empty());
        assert_eq!(table.total(Scope::AllAccounts, &[jan()]), 0.0);
        assert!(table.categories_for("a").is_empty());
    }
}
