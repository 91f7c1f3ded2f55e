//! Export module for the expense tracker
//!
//! Writes a monthly report to disk in two formats:
//! - CSV: category totals as a table (spreadsheet-compatible)
//! - Text: a narrative summary for reading

pub mod csv;
pub mod text;

pub use self::csv::{export_report_csv, parse_report_csv, write_report_csv, ParsedReport};
pub use self::text::{export_report_text, write_report_text};
