//! Text Export functionality
//!
//! Writes a monthly report as a short human-readable summary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{TrackerError, TrackerResult};
use crate::reports::MonthlyReport;

/// Export a monthly report as narrative text
///
/// Categories are listed by descending amount. The output always ends with a
/// newline.
pub fn export_report_text<W: Write>(
    report: &MonthlyReport,
    currency_symbol: &str,
    writer: &mut W,
) -> TrackerResult<()> {
    writeln!(writer, "Monthly Report - {}", report.month_name()).map_err(export_err)?;
    writeln!(writer, "{}", "=".repeat(40)).map_err(export_err)?;
    writeln!(writer).map_err(export_err)?;

    if report.is_empty() {
        writeln!(writer, "No expenses recorded for this month.").map_err(export_err)?;
        return Ok(());
    }

    for total in report.by_amount_desc() {
        writeln!(
            writer,
            "{}: {} ({} items)",
            total.category,
            total.amount.format_with_symbol(currency_symbol),
            total.count
        )
        .map_err(export_err)?;
    }

    writeln!(writer).map_err(export_err)?;
    writeln!(
        writer,
        "Total Spent: {}",
        report.total_spent.format_with_symbol(currency_symbol)
    )
    .map_err(export_err)?;

    Ok(())
}

/// Write the text export to `path`, overwriting any existing file
pub fn write_report_text(
    report: &MonthlyReport,
    currency_symbol: &str,
    path: impl AsRef<Path>,
) -> TrackerResult<PathBuf> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        TrackerError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    export_report_text(report, currency_symbol, &mut writer)?;
    writer.flush().map_err(export_err)?;

    Ok(path.to_path_buf())
}

fn export_err(e: std::io::Error) -> TrackerError {
    TrackerError::Export(e.to_string())
}
