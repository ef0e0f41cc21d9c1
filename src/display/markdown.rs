//! Markdown report document

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use super::{section_title, TableCells};
use crate::reports::ReportSet;

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|")
}

/// Render one table as a markdown table with right-aligned value columns
pub fn render_markdown_table(cells: &TableCells) -> String {
    let mut builder = Builder::default();
    builder.push_record(cells.headers.iter().map(|h| escape_cell(h)));
    for row in cells.rows.iter().chain(std::iter::once(&cells.total)) {
        builder.push_record(row.iter().map(|c| escape_cell(c)));
    }

    let mut table = builder.build();
    table
        .with(Style::markdown())
        .modify(Columns::new(1..), Alignment::right());
    table.to_string()
}

/// Render a whole report as a markdown document
pub fn render_markdown(report_name: &str, set: &ReportSet) -> String {
    let mut out = format!("# {}\n", report_name);

    for section in set.sections() {
        let cells = TableCells::from_table(&section.table, set.kind);
        out.push_str(&format!(
            "\n## {}\n\n{}\n",
            section_title(&section.table.shape, set.kind),
            render_markdown_table(&cells)
        ));
    }

    out
}
