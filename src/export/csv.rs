//! CSV Export functionality
//!
//! Writes a monthly report as a small spreadsheet-compatible table and reads
//! such a table back.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{TrackerError, TrackerResult};
use crate::models::Money;
use crate::reports::{CategoryTotal, MonthlyReport};

/// Header row of the tabular export
pub const REPORT_HEADER: [&str; 3] = ["Category", "Total Amount", "Count"];

/// Label of the trailing grand-total row
const TOTAL_LABEL: &str = "Total";

/// A tabular report read back from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReport {
    pub rows: Vec<CategoryTotal>,
    pub total: Option<Money>,
}

/// Export a monthly report to CSV
///
/// One row per category in report order, a blank line, then the
/// `Total,<amount>,` row.
pub fn export_report_csv<W: Write>(report: &MonthlyReport, writer: &mut W) -> TrackerResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(REPORT_HEADER).map_err(export_err)?;
    for total in &report.categories {
        wtr.write_record([
            total.category.clone(),
            total.amount.to_string(),
            total.count.to_string(),
        ])
        .map_err(export_err)?;
    }

    // The csv writer renders an empty record as `""`, so the separator line
    // goes straight to the underlying writer
    let inner = wtr.into_inner().map_err(|e| export_err(e.error()))?;
    inner.write_all(b"\n").map_err(export_err)?;

    let mut wtr = csv::Writer::from_writer(inner);
    wtr.write_record([TOTAL_LABEL.to_string(), report.total_spent.to_string(), String::new()])
        .map_err(export_err)?;
    wtr.flush().map_err(export_err)?;

    Ok(())
}

/// Write the CSV export to `path`, overwriting any existing file
pub fn write_report_csv(report: &MonthlyReport, path: impl AsRef<Path>) -> TrackerResult<PathBuf> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| {
        TrackerError::Export(format!("Failed to create {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);

    export_report_csv(report, &mut writer)?;
    writer.flush().map_err(export_err)?;

    Ok(path.to_path_buf())
}

/// Read a CSV export back into category rows and the grand total
///
/// Blank lines are ignored. A row whose count column is empty is the total.
pub fn parse_report_csv<R: Read>(reader: R) -> TrackerResult<ParsedReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut parsed = ParsedReport {
        rows: Vec::new(),
        total: None,
    };

    for record in rdr.records() {
        let record = record.map_err(export_err)?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let label = record.get(0).unwrap_or_default();
        let amount = record
            .get(1)
            .unwrap_or_default()
            .parse::<Money>()
            .map_err(|e| TrackerError::Export(format!("Line {}: {}", line, e)))?;
        let count = record.get(2).unwrap_or_default().trim();

        if count.is_empty() && label == TOTAL_LABEL {
            parsed.total = Some(amount);
            continue;
        }

        let count = count.parse::<usize>().map_err(|_| {
            TrackerError::Export(format!("Line {}: invalid count '{}'", line, count))
        })?;

        parsed.rows.push(CategoryTotal {
            category: label.to_string(),
            amount,
            count,
        });
    }

    Ok(parsed)
}

fn export_err(e: impl std::fmt::Display) -> TrackerError {
    TrackerError::Export(e.to_string())
}
