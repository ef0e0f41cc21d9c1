//! Interactive HTML report document
//!
//! A single self-contained page: Bootstrap for layout, Chart.js for the
//! charts, and a small script that sorts a table by its name or Total column
//! while keeping the total row pinned to the bottom.

use std::collections::HashSet;

use serde::Serialize;

use super::{section_title, TableCells};
use crate::error::{ReportError, ReportResult};
use crate::models::ReportKind;
use crate::reports::{ChartData, ReportSet, TableShape};

const HEAD_STYLE: &str = r#"    <style>
        .accent {
            color: #ff9900;
            border-color: #ff9900;
        }
        .accent-border-left {
            border-left: 4px solid #ff9900;
        }
        .chart-container {
            margin: 2rem 0;
        }
        .total-row {
            background-color: #e9ecef !important;
            font-weight: bold;
        }
        canvas {
            max-height: 400px;
        }
        .table-responsive {
            margin: 1.5rem 0;
        }
        .sortable {
            cursor: pointer;
            user-select: none;
        }
        .sortable:hover {
            background-color: #495057 !important;
        }
        .sort-icon {
            margin-left: 5px;
            opacity: 0.5;
        }
        .sort-active {
            opacity: 1;
        }
    </style>
"#;

const SORT_SCRIPT: &str = r#"    <script>
        function sortTable(tableId, columnIndex, isNumeric) {
            const table = document.getElementById(tableId);
            const tbody = table.getElementsByTagName('tbody')[0];
            const rows = Array.from(tbody.getElementsByTagName('tr'));
            const totalRow = rows.pop();

            const header = table.getElementsByTagName('th')[columnIndex];
            const current = header.getAttribute('data-sort-direction') || 'none';
            const direction = current === 'asc' ? 'desc' : 'asc';

            const headers = table.getElementsByTagName('th');
            for (let i = 0; i < headers.length; i++) {
                headers[i].setAttribute('data-sort-direction', 'none');
                const icon = headers[i].querySelector('.sort-icon');
                if (icon) {
                    icon.innerHTML = '&#8597;';
                    icon.classList.remove('sort-active');
                }
            }

            header.setAttribute('data-sort-direction', direction);
            const icon = header.querySelector('.sort-icon');
            if (icon) {
                icon.innerHTML = direction === 'asc' ? '&#8593;' : '&#8595;';
                icon.classList.add('sort-active');
            }

            rows.sort((a, b) => {
                let aVal = a.getElementsByTagName('td')[columnIndex].textContent.trim();
                let bVal = b.getElementsByTagName('td')[columnIndex].textContent.trim();
                if (isNumeric) {
                    aVal = parseFloat(aVal.replace(/[$,\s]/g, '')) || 0;
                    bVal = parseFloat(bVal.replace(/[$,\s]/g, '')) || 0;
                    return direction === 'asc' ? aVal - bVal : bVal - aVal;
                }
                return direction === 'asc' ? aVal.localeCompare(bVal) : bVal.localeCompare(aVal);
            });

            tbody.innerHTML = '';
            rows.forEach(row => tbody.appendChild(row));
            tbody.appendChild(totalRow);
        }

        document.addEventListener('DOMContentLoaded', function() {
            document.querySelectorAll('.sortable').forEach(header => {
                const icon = document.createElement('span');
                icon.className = 'sort-icon';
                icon.innerHTML = '&#8597;';
                header.appendChild(icon);
            });
        });
    </script>
"#;

const FOOTER: &str = r#"                </div>
            </div>
        </div>
    </div>
</body>
</html>
"#;

/// Escape text for use in HTML content and attributes
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Turn an account name into something usable inside a chart id
fn safe_id(account: &str) -> String {
    account
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Serialize a value for embedding inside a `<script>` element
fn script_json<T: Serialize + ?Sized>(value: &T) -> ReportResult<String> {
    serde_json::to_string(value)
        .map(|json| json.replace("</", "<\\/"))
        .map_err(|e| ReportError::Render(format!("Failed to embed chart data: {}", e)))
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ids and titles of the two charts following a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartLabels {
    pub bar_id: String,
    pub bar_title: String,
    pub pie_id: String,
    pub pie_title: String,
}

impl ChartLabels {
    /// Chart ids and titles for a table shape
    pub fn for_shape(shape: &TableShape, kind: ReportKind) -> Self {
        let metric = kind.metric_noun();
        let category = kind.category_header();

        match shape {
            TableShape::Account(account) => Self {
                bar_id: format!("{}{}BarChart", safe_id(account), category),
                bar_title: format!("{} per {} over Time - {}", metric, category, account),
                pie_id: format!("{}{}PieChart", safe_id(account), category),
                pie_title: format!("{} {} Distribution - {}", category, metric, account),
            },
            TableShape::AccountTotals => Self {
                bar_id: "accountBarChart".to_string(),
                bar_title: format!("{} per Account over Time", metric),
                pie_id: "accountPieChart".to_string(),
                pie_title: format!("Total {} Distribution by Account", metric),
            },
            TableShape::CategoryTotals => Self {
                bar_id: format!("{}BarChart", kind.category_noun()),
                bar_title: format!("{} per {} over Time", metric, category),
                pie_id: format!("{}PieChart", kind.category_noun()),
                pie_title: format!("Total {} Distribution by {}", metric, category),
            },
        }
    }
}

/// An HTML document under construction
pub struct HtmlDocument {
    title: String,
    value_prefix: &'static str,
    body: String,
    table_counter: usize,
    chart_ids: HashSet<String>,
}

impl HtmlDocument {
    /// Start a document; cost reports prefix chart values with "$"
    pub fn new(title: &str, kind: ReportKind) -> Self {
        Self {
            title: title.to_string(),
            value_prefix: match kind {
                ReportKind::Cost => "$",
                ReportKind::Findings => "",
            },
            body: String::new(),
            table_counter: 0,
            chart_ids: HashSet::new(),
        }
    }

    /// Number of tables added so far
    pub fn table_count(&self) -> usize {
        self.table_counter
    }

    /// Add a section heading
    pub fn push_heading(&mut self, text: &str) {
        self.body.push_str(&format!(
            "<h2 class=\"accent-border-left ps-3 mt-4 mb-3\">{}</h2>\n",
            escape_html(text)
        ));
    }

    /// Add a sortable table; returns its id
    pub fn push_table(&mut self, cells: &TableCells) -> String {
        self.table_counter += 1;
        let table_id = format!("table_{}", self.table_counter);
        let last = cells.headers.len().saturating_sub(1);

        let mut html = String::from("<div class=\"table-responsive\">\n");
        html.push_str(&format!(
            "<table id=\"{}\" class=\"table table-striped table-hover table-sm\">\n",
            table_id
        ));
        html.push_str("  <thead class=\"table-dark\">\n    <tr>\n");
        for (i, header) in cells.headers.iter().enumerate() {
            let alignment = if i == 0 { "text-start" } else { "text-end" };
            if i == 0 || i == last {
                html.push_str(&format!(
                    "      <th class=\"{} sortable\" onclick=\"sortTable('{}', {}, {})\">{}</th>\n",
                    alignment,
                    table_id,
                    i,
                    i > 0,
                    escape_html(header)
                ));
            } else {
                html.push_str(&format!(
                    "      <th class=\"{}\">{}</th>\n",
                    alignment,
                    escape_html(header)
                ));
            }
        }
        html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

        for row in &cells.rows {
            html.push_str("    <tr>\n");
            push_cells(&mut html, row);
            html.push_str("    </tr>\n");
        }
        html.push_str("    <tr class=\"total-row table-warning\">\n");
        push_cells(&mut html, &cells.total);
        html.push_str("    </tr>\n  </tbody>\n</table>\n</div>\n");

        self.body.push_str(&html);
        table_id
    }

    /// Claim a canvas id, suffixing `_2`, `_3`, ... when already taken
    fn claim_chart_id(&mut self, base: &str) -> String {
        let mut id = base.to_string();
        let mut n = 1;
        while self.chart_ids.contains(&id) {
            n += 1;
            id = format!("{}_{}", base, n);
        }
        self.chart_ids.insert(id.clone());
        id
    }

    /// Add the stacked-bar and pie panels of a table
    ///
    /// Account names that sanitize to the same id get numbered ids.
    pub fn push_charts(&mut self, chart: &ChartData, labels: &ChartLabels) -> ReportResult<()> {
        let datasets: Vec<_> = chart
            .stacked
            .iter()
            .map(|series| {
                let mut series = series.clone();
                series.data = series.data.iter().map(|v| round_cents(*v)).collect();
                series
            })
            .collect();

        let pie_labels: Vec<&str> = chart.proportions.iter().map(|s| s.label.as_str()).collect();
        let pie_data: Vec<f64> = chart.proportions.iter().map(|s| round_cents(s.value)).collect();
        let pie_colors: Vec<&str> = chart.proportions.iter().map(|s| s.color).collect();

        let bar_id = self.claim_chart_id(&labels.bar_id);
        let pie_id = self.claim_chart_id(&labels.pie_id);

        let bar = self.bar_chart(
            &bar_id,
            &labels.bar_title,
            &script_json(&chart.labels)?,
            &script_json(&datasets)?,
        );
        let pie = self.pie_chart(
            &pie_id,
            &labels.pie_title,
            &script_json(&pie_labels)?,
            &script_json(&pie_data)?,
            &script_json(&pie_colors)?,
        );

        self.body.push_str("<div class=\"chart-container\">\n    <div class=\"row\">\n");
        self.body.push_str(&bar);
        self.body.push_str(&pie);
        self.body.push_str("    </div>\n</div>\n");
        Ok(())
    }

    fn panel(chart_id: &str, title: &str) -> String {
        format!(
            r#"        <div class="col-lg-6 col-md-12 mb-4">
            <div class="card h-100">
                <div class="card-header bg-light">
                    <h5 class="card-title text-center mb-0">{title}</h5>
                </div>
                <div class="card-body">
                    <canvas id="{chart_id}"></canvas>
                </div>
            </div>
        </div>
"#,
            title = escape_html(title),
            chart_id = chart_id
        )
    }

    fn bar_chart(&self, chart_id: &str, title: &str, labels: &str, datasets: &str) -> String {
        format!(
            r#"{panel}        <script>
        new Chart(document.getElementById('{id}').getContext('2d'), {{
            type: 'bar',
            data: {{ labels: {labels}, datasets: {datasets} }},
            options: {{
                responsive: true,
                scales: {{
                    x: {{ stacked: true }},
                    y: {{
                        stacked: true,
                        ticks: {{ callback: function(value) {{ return '{prefix}' + value.toLocaleString(); }} }}
                    }}
                }},
                plugins: {{
                    legend: {{ position: 'top' }},
                    tooltip: {{
                        callbacks: {{
                            label: function(context) {{
                                return context.dataset.label + ': {prefix}' + context.raw.toLocaleString();
                            }}
                        }}
                    }}
                }}
            }}
        }});
        </script>
"#,
            panel = Self::panel(chart_id, title),
            id = chart_id,
            labels = labels,
            datasets = datasets,
            prefix = self.value_prefix
        )
    }

    fn pie_chart(
        &self,
        chart_id: &str,
        title: &str,
        labels: &str,
        data: &str,
        colors: &str,
    ) -> String {
        format!(
            r#"{panel}        <script>
        new Chart(document.getElementById('{id}').getContext('2d'), {{
            type: 'pie',
            data: {{
                labels: {labels},
                datasets: [{{ data: {data}, backgroundColor: {colors}, borderWidth: 1 }}]
            }},
            options: {{
                responsive: true,
                plugins: {{
                    legend: {{ position: 'right' }},
                    tooltip: {{
                        callbacks: {{
                            label: function(context) {{
                                const total = context.dataset.data.reduce((a, b) => a + b, 0);
                                const percentage = ((context.raw / total) * 100).toFixed(1);
                                return context.label + ': {prefix}' + context.raw.toLocaleString() + ' (' + percentage + '%)';
                            }}
                        }}
                    }}
                }}
            }}
        }});
        </script>
"#,
            panel = Self::panel(chart_id, title),
            id = chart_id,
            labels = labels,
            data = data,
            colors = colors,
            prefix = self.value_prefix
        )
    }

    /// Wrap the body in the page header and footer
    pub fn finish(self) -> String {
        let title = escape_html(&self.title);
        let mut out = String::with_capacity(self.body.len() + 8192);
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("    <meta charset=\"UTF-8\">\n");
        out.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        out.push_str(&format!("    <title>{}</title>\n", title));
        out.push_str("    <link href=\"https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css\" rel=\"stylesheet\">\n");
        out.push_str("    <script src=\"https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js\"></script>\n");
        out.push_str("    <script src=\"https://cdn.jsdelivr.net/npm/chart.js\"></script>\n");
        out.push_str(HEAD_STYLE);
        out.push_str(SORT_SCRIPT);
        out.push_str("</head>\n<body class=\"bg-light\">\n");
        out.push_str("    <div class=\"container-fluid\">\n        <div class=\"row\">\n            <div class=\"col-12\">\n");
        out.push_str("                <div class=\"bg-white shadow-sm rounded p-4 mb-4\">\n");
        out.push_str(&format!(
            "                    <h1 class=\"text-center accent border-bottom border-3 pb-3 mb-4\">{}</h1>\n",
            title
        ));
        out.push_str(&self.body);
        out.push_str(FOOTER);
        out
    }
}

fn push_cells(html: &mut String, cells: &[String]) {
    for (j, cell) in cells.iter().enumerate() {
        let alignment = if j == 0 { "text-start fw-bold" } else { "text-end" };
        html.push_str(&format!(
            "      <td class=\"{}\">{}</td>\n",
            alignment,
            escape_html(cell)
        ));
    }
}

/// Render a whole report as an interactive HTML document
///
/// Charts are left out for tables with nothing to plot.
pub fn render_html(report_name: &str, set: &ReportSet) -> ReportResult<String> {
    let mut doc = HtmlDocument::new(report_name, set.kind);

    for section in set.sections() {
        let shape = &section.table.shape;
        doc.push_heading(&section_title(shape, set.kind));
        doc.push_table(&TableCells::from_table(&section.table, set.kind));
        if !section.chart.is_empty() {
            doc.push_charts(&section.chart, &ChartLabels::for_shape(shape, set.kind))?;
        }
    }

    Ok(doc.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::{ProportionSlice, StackedSeries};

    fn cells() -> TableCells {
        TableCells {
            headers: vec!["Service".into(), "January".into(), "February".into(), "Total".into()],
            rows: vec![vec![
                "<EC2>".into(),
                "$ 1.00".into(),
                "$ 2.00".into(),
                "$ 3.00".into(),
            ]],
            total: vec!["Total".into(), "$ 1.00".into(), "$ 2.00".into(), "$ 3.00".into()],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & <b> \"c\""), "a &amp; &lt;b&gt; &quot;c&quot;");
    }

    #[test]
    fn test_table_ids_count_up() {
        let mut doc = HtmlDocument::new("r", ReportKind::Cost);
        assert_eq!(doc.push_table(&cells()), "table_1");
        assert_eq!(doc.push_table(&cells()), "table_2");
        assert_eq!(doc.table_count(), 2);
    }

    #[test]
    fn test_only_name_and_total_sortable() {
        let mut doc = HtmlDocument::new("r", ReportKind::Cost);
        doc.push_table(&cells());
        let html = doc.finish();

        assert!(html.contains("onclick=\"sortTable('table_1', 0, false)\""));
        assert!(html.contains("onclick=\"sortTable('table_1', 3, true)\""));
        assert!(!html.contains("sortTable('table_1', 1,"));
        assert!(!html.contains("sortTable('table_1', 2,"));
        assert!(html.contains("<tr class=\"total-row table-warning\">"));
        assert!(html.contains("&lt;EC2&gt;"));
    }

    #[test]
    fn test_chart_labels() {
        let labels = ChartLabels::for_shape(&TableShape::Account("my-prod acct".into()), ReportKind::Cost);
        assert_eq!(labels.bar_id, "my_prod_acctServiceBarChart");
        assert_eq!(labels.pie_id, "my_prod_acctServicePieChart");
        assert_eq!(labels.bar_title, "Cost per Service over Time - my-prod acct");
        assert_eq!(labels.pie_title, "Service Cost Distribution - my-prod acct");

        let labels = ChartLabels::for_shape(&TableShape::CategoryTotals, ReportKind::Cost);
        assert_eq!(labels.bar_id, "serviceBarChart");
        assert_eq!(labels.pie_title, "Total Cost Distribution by Service");

        let labels = ChartLabels::for_shape(&TableShape::AccountTotals, ReportKind::Findings);
        assert_eq!(labels.pie_id, "accountPieChart");
        assert_eq!(labels.bar_title, "Findings per Account over Time");
    }

    #[test]
    fn test_colliding_account_names_get_distinct_chart_ids() {
        use crate::models::{CategoryFilter, Granularity, Period, RawRecord};
        use crate::reports::SortPolicy;
        use crate::services::Aggregator;

        let mut agg = Aggregator::new(
            vec!["prod-a".into(), "prod_a".into()],
            CategoryFilter::show_all(),
            vec![],
            Granularity::Monthly,
        );
        agg.ingest_all(vec![
            RawRecord::new("prod-a", "EC2", "2024-01", 1.0),
            RawRecord::new("prod_a", "EC2", "2024-01", 2.0),
        ]);
        let table = agg.finish();
        let periods = vec![Period::monthly(2024, 1)];
        let set = ReportSet::build(
            &table,
            &periods,
            &CategoryFilter::show_all(),
            SortPolicy::Name,
            ReportKind::Cost,
        );

        let html = render_html("r", &set).unwrap();
        for id in [
            "prod_aServiceBarChart",
            "prod_aServicePieChart",
            "prod_aServiceBarChart_2",
            "prod_aServicePieChart_2",
        ] {
            assert_eq!(html.matches(&format!("<canvas id=\"{}\">", id)).count(), 1, "{}", id);
            assert_eq!(html.matches(&format!("getElementById('{}')", id)).count(), 1, "{}", id);
        }
    }

    #[test]
    fn test_unserializable_chart_data_is_a_render_error() {
        let mut keyed = std::collections::BTreeMap::new();
        keyed.insert(vec![1u8], 1u8);
        assert!(matches!(script_json(&keyed), Err(ReportError::Render(_))));
    }

    #[test]
    fn test_chart_data_embedded_as_json() {
        let chart = ChartData {
            labels: vec!["January".into()],
            stacked: vec![StackedSeries {
                label: "EC2".into(),
                data: vec![1.234],
                background_color: "#FF6384",
            }],
            proportions: vec![ProportionSlice {
                label: "</script>".into(),
                value: 1.234,
                color: "#FF6384",
            }],
        };
        let labels = ChartLabels::for_shape(&TableShape::AccountTotals, ReportKind::Cost);

        let mut doc = HtmlDocument::new("r", ReportKind::Cost);
        doc.push_charts(&chart, &labels).unwrap();
        let html = doc.finish();

        assert!(html.contains(r##"[{"label":"EC2","data":[1.23],"backgroundColor":"#FF6384"}]"##));
        assert!(html.contains("<canvas id=\"accountBarChart\"></canvas>"));
        assert!(html.contains("<canvas id=\"accountPieChart\"></canvas>"));
        assert!(html.contains(r#"["<\/script>"]"#));
        assert!(html.ends_with("</html>\n"));
    }
}
