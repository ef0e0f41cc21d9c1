//! Chart data
//!
//! Stacked-bar and proportion datasets, built from the same entity list as
//! the matching report table so charts and tables never disagree.

use serde::Serialize;

use crate::models::{sum_values, AggregationTable, Period, ReportKind, Scope};

use super::table::{entity_series, ReportTable, RowKey};

/// Fixed chart palette; entity `i` gets color `i % 30`
pub const PALETTE: [&str; 30] = [
    "#FF6384", "#36A2EB", "#FFCE56", "#4BC0C0", "#9966FF", "#FF9F40", "#FF6B6B", "#4ECDC4",
    "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8", "#F7DC6F", "#BB8FCE", "#85C1E9",
    "#F8C471", "#82E0AA", "#F1948A", "#85929E", "#5DADE2", "#58D68D", "#F4D03F", "#AF7AC5",
    "#5499C7", "#52BE80", "#F39C12", "#E74C3C", "#8E44AD", "#3498DB",
];

/// Palette color of the entity at a position
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Fixed colors of the security finding severities
pub const SEVERITY_COLORS: [(&str, &str); 5] = [
    ("CRITICAL", "#DC3545"),
    ("HIGH", "#FD7E14"),
    ("MEDIUM", "#FFC107"),
    ("LOW", "#20C997"),
    ("INFORMATIONAL", "#6C757D"),
];

/// Color of a severity label, case-insensitive
pub fn severity_color(label: &str) -> Option<&'static str> {
    SEVERITY_COLORS
        .iter()
        .find(|(severity, _)| severity.eq_ignore_ascii_case(label.trim()))
        .map(|(_, color)| *color)
}

/// One stacked-bar series
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackedSeries {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: &'static str,
}

/// One slice of a proportion chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionSlice {
    pub label: String,
    pub value: f64,
    pub color: &'static str,
}

/// Everything needed to draw the two charts of one table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// X axis labels, one per period
    pub labels: Vec<String>,
    /// One series per entity, in entity order
    pub stacked: Vec<StackedSeries>,
    /// One slice per entity with a nonzero total
    pub proportions: Vec<ProportionSlice>,
}

impl ChartData {
    /// Check if there is nothing to plot
    pub fn is_empty(&self) -> bool {
        self.proportions.is_empty()
    }
}

/// Builds chart datasets from a finished aggregation table
pub struct ChartDataBuilder<'a> {
    table: &'a AggregationTable,
    periods: &'a [Period],
    kind: ReportKind,
}

impl<'a> ChartDataBuilder<'a> {
    pub fn new(table: &'a AggregationTable, periods: &'a [Period], kind: ReportKind) -> Self {
        Self {
            table,
            periods,
            kind,
        }
    }

    /// Color of an entity; findings severities keep their own color
    fn color(&self, idx: usize, entity: &RowKey) -> &'static str {
        match (self.kind, entity) {
            (ReportKind::Findings, RowKey::Category(category)) => {
                severity_color(category.name()).unwrap_or_else(|| color_for(idx))
            }
            _ => color_for(idx),
        }
    }

    /// Build datasets for an ordered entity list within a scope
    pub fn build(&self, entities: &[RowKey], scope: Scope<'_>) -> ChartData {
        let mut stacked = Vec::with_capacity(entities.len());
        let mut proportions = Vec::new();

        for (idx, entity) in entities.iter().enumerate() {
            let color = self.color(idx, entity);
            let data = entity_series(self.table, entity, scope, self.periods);
            let total = sum_values(data.iter().copied());

            if total != 0.0 {
                proportions.push(ProportionSlice {
                    label: entity.label().to_string(),
                    value: total,
                    color,
                });
            }

            stacked.push(StackedSeries {
                label: entity.label().to_string(),
                data,
                background_color: color,
            });
        }

        ChartData {
            labels: self.periods.iter().map(|p| p.label()).collect(),
            stacked,
            proportions,
        }
    }

    /// Build datasets matching a report table
    pub fn for_table(&self, report: &ReportTable) -> ChartData {
        self.build(&report.entities, report.shape.scope())
    }
}
