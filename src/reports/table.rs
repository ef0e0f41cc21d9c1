//! Report tables
//!
//! Derives the three table shapes of a report from one aggregation table:
//! categories of a single account, categories summed over all accounts, and
//! account totals. Row order follows the run's sort policy; the Other row (if
//! any) follows the sorted rows and the Total row always comes last.

use crate::models::{
    sum_values, AggregationTable, CategoryFilter, CategoryKey, Period, ReportKind, Scope,
    OTHER_LABEL,
};

use super::sort::SortPolicy;

/// Label of the trailing total row and column
pub const TOTAL_LABEL: &str = "Total";

/// What a report row stands for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// A category (possibly Other)
    Category(CategoryKey),
    /// An account
    Account(String),
}

impl RowKey {
    /// Display label of the row
    pub fn label(&self) -> &str {
        match self {
            Self::Category(category) => category.name(),
            Self::Account(account) => account,
        }
    }
}

/// Which of the three report tables this is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableShape {
    /// Categories of one account
    Account(String),
    /// Categories summed across every account
    CategoryTotals,
    /// One row per account
    AccountTotals,
}

impl TableShape {
    /// Scope the table's values are summed over
    pub fn scope(&self) -> Scope<'_> {
        match self {
            Self::Account(account) => Scope::Account(account),
            Self::CategoryTotals | Self::AccountTotals => Scope::AllAccounts,
        }
    }

    /// Short machine-friendly name
    pub fn slug(&self) -> String {
        match self {
            Self::Account(account) => format!("account:{}", account),
            Self::CategoryTotals => "category_totals".to_string(),
            Self::AccountTotals => "account_totals".to_string(),
        }
    }
}

/// One row: a value per period plus the row total
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Row label
    pub label: String,
    /// One value per report period
    pub cells: Vec<f64>,
    /// Sum of the cells
    pub total: f64,
}

impl ReportRow {
    fn from_cells(label: impl Into<String>, cells: Vec<f64>) -> Self {
        let total = sum_values(cells.iter().copied());
        Self {
            label: label.into(),
            cells,
            total,
        }
    }
}

/// A built report table
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    /// Which table this is
    pub shape: TableShape,
    /// Header of the label column ("Service", "Account", ...)
    pub row_header: String,
    /// Columns, in order
    pub periods: Vec<Period>,
    /// Entities behind the rows, aligned with `rows`
    pub entities: Vec<RowKey>,
    /// Ordered rows, excluding the total row
    pub rows: Vec<ReportRow>,
    /// The trailing total row
    pub total_row: ReportRow,
}

impl ReportTable {
    /// Column headers after the label column (period labels, then Total)
    pub fn column_labels(&self) -> Vec<String> {
        self.periods
            .iter()
            .map(|p| p.label())
            .chain(std::iter::once(TOTAL_LABEL.to_string()))
            .collect()
    }

    /// Reconciled grand total of the table
    pub fn grand_total(&self) -> f64 {
        self.total_row.total
    }

    /// Find a row by label
    pub fn row(&self, label: &str) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    /// Row labels in display order
    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }
}

/// Values of an entity for each period, within a scope
///
/// Account entities always cover every category of that account.
pub fn entity_series(
    table: &AggregationTable,
    entity: &RowKey,
    scope: Scope<'_>,
    periods: &[Period],
) -> Vec<f64> {
    match entity {
        RowKey::Category(category) => periods
            .iter()
            .map(|period| table.value(scope, category, *period))
            .collect(),
        RowKey::Account(account) => periods
            .iter()
            .map(|period| table.period_total(Scope::Account(account), *period))
            .collect(),
    }
}

/// Builds report tables from a finished aggregation table
pub struct TableBuilder<'a> {
    table: &'a AggregationTable,
    periods: &'a [Period],
    filter: &'a CategoryFilter,
    sort: SortPolicy,
    kind: ReportKind,
}

impl<'a> TableBuilder<'a> {
    /// Create a table builder
    pub fn new(
        table: &'a AggregationTable,
        periods: &'a [Period],
        filter: &'a CategoryFilter,
        sort: SortPolicy,
        kind: ReportKind,
    ) -> Self {
        Self {
            table,
            periods,
            filter,
            sort,
            kind,
        }
    }

    /// Ordered category entities of a scope
    ///
    /// With an allow-list every listed category is included, followed by
    /// Other when the scope's Other total is nonzero. Without one, every
    /// category encountered in the scope is included except a raw category
    /// named "Other", which only counts toward the Total row.
    pub fn category_entities(&self, scope: Scope<'_>) -> Vec<RowKey> {
        let candidates: Vec<CategoryKey> = if self.filter.is_show_all() {
            match scope {
                Scope::Account(account) => self
                    .table
                    .categories_for(account)
                    .into_iter()
                    .filter(|c| c.name() != OTHER_LABEL)
                    .cloned()
                    .collect(),
                Scope::AllAccounts => self
                    .table
                    .categories()
                    .iter()
                    .filter(|c| c.name() != OTHER_LABEL)
                    .cloned()
                    .collect(),
            }
        } else {
            self.filter
                .allowed()
                .iter()
                .map(|name| CategoryKey::explicit(name.as_str()))
                .collect()
        };

        let mut ordered = self
            .sort
            .order_categories(self.table, candidates, scope, self.periods);

        if self.filter.uses_other()
            && self
                .table
                .category_total(scope, &CategoryKey::Other, self.periods)
                != 0.0
        {
            ordered.push(CategoryKey::Other);
        }

        ordered.into_iter().map(RowKey::Category).collect()
    }

    /// Ordered account entities
    pub fn account_entities(&self) -> Vec<RowKey> {
        self.sort
            .order_accounts(self.table, self.table.accounts(), self.periods)
            .into_iter()
            .map(RowKey::Account)
            .collect()
    }

    /// Categories of one account
    pub fn account_table(&self, account: &str) -> ReportTable {
        let shape = TableShape::Account(account.to_string());
        let entities = self.category_entities(Scope::Account(account));
        self.build(shape, self.kind.category_header(), entities)
    }

    /// Categories summed across every configured account
    pub fn category_table(&self) -> ReportTable {
        let entities = self.category_entities(Scope::AllAccounts);
        self.build(
            TableShape::CategoryTotals,
            self.kind.category_header(),
            entities,
        )
    }

    /// One row per configured account
    pub fn account_totals_table(&self) -> ReportTable {
        let entities = self.account_entities();
        self.build(TableShape::AccountTotals, "Account", entities)
    }

    fn build(&self, shape: TableShape, row_header: &str, entities: Vec<RowKey>) -> ReportTable {
        let scope = shape.scope();

        let rows = entities
            .iter()
            .map(|entity| {
                ReportRow::from_cells(
                    entity.label(),
                    entity_series(self.table, entity, scope, self.periods),
                )
            })
            .collect();

        // Summed from the table, not from the rows, so folded amounts count
        let total_cells = self
            .periods
            .iter()
            .map(|period| self.table.period_total(scope, *period))
            .collect();

        ReportTable {
            row_header: row_header.to_string(),
            periods: self.periods.to_vec(),
            entities,
            rows,
            total_row: ReportRow::from_cells(TOTAL_LABEL, total_cells),
            shape,
        }
    }
}
