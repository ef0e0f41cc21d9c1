//! CSV export of report tables
//!
//! Flattens every table of a report into `table,row,period,value` lines so
//! the numbers can be loaded into a spreadsheet.

use std::io::Write;

use crate::error::{ReportError, ReportResult};
use crate::models::{Period, ReportKind};
use crate::reports::{ReportRow, ReportSet, TOTAL_LABEL};

/// Export every table of a report to CSV
///
/// Periods are written in canonical form; each row also gets a line for its
/// Total column.
pub fn export_report_csv<W: Write>(
    set: &ReportSet,
    kind: ReportKind,
    writer: &mut W,
) -> ReportResult<()> {
    writeln!(writer, "table,row,period,value").map_err(|e| ReportError::Export(e.to_string()))?;

    for section in set.sections() {
        let table = &section.table;
        let slug = table.shape.slug();

        for row in table.rows.iter().chain(std::iter::once(&table.total_row)) {
            write_row(writer, &slug, row, &table.periods, kind)?;
        }
    }

    Ok(())
}

fn write_row<W: Write>(
    writer: &mut W,
    table: &str,
    row: &ReportRow,
    periods: &[Period],
    kind: ReportKind,
) -> ReportResult<()> {
    let values = periods
        .iter()
        .map(|p| p.key())
        .zip(row.cells.iter().copied())
        .chain(std::iter::once((TOTAL_LABEL.to_string(), row.total)));

    for (period, value) in values {
        writeln!(
            writer,
            "{},{},{},{}",
            escape_csv(table),
            escape_csv(&row.label),
            period,
            kind.format_plain(value)
        )
        .map_err(|e| ReportError::Export(e.to_string()))?;
    }

    Ok(())
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
