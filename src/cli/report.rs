//! CLI commands for reports
//!
//! Shows the monthly category report and exports it to a file.

use std::path::PathBuf;

use chrono::{Datelike, Local};
use clap::{Subcommand, ValueEnum};

use crate::config::settings::Settings;
use crate::error::TrackerResult;
use crate::export::{write_report_csv, write_report_text};
use crate::reports::MonthlyReport;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV table of category totals
    Csv,
    /// Plain-text summary
    Txt,
}

impl ExportFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
        }
    }
}

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Show spending per category for a month
    Report {
        /// Report year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Report month, 1-12 (defaults to the current month)
        #[arg(short = 'M', long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Export the monthly report to a file
    Export {
        /// Report year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Report month, 1-12 (defaults to the current month)
        #[arg(short = 'M', long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
        /// Export format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
        /// Output file path (defaults to report_YYYY-MM.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> TrackerResult<()> {
    match cmd {
        ReportCommands::Report { year, month } => {
            let (year, month) = year_month_or_current(year, month);
            let report = MonthlyReport::generate(&storage.expenses, year, month)?;
            print!("{}", report.format_terminal(&settings.currency_symbol));
        }

        ReportCommands::Export {
            year,
            month,
            format,
            output,
        } => {
            let (year, month) = year_month_or_current(year, month);
            let report = MonthlyReport::generate(&storage.expenses, year, month)?;

            if report.is_empty() {
                println!(
                    "No expenses recorded for {}. Nothing exported.",
                    report.month_name()
                );
                return Ok(());
            }

            let path = output.unwrap_or_else(|| default_export_path(year, month, format));
            let written = match format {
                ExportFormat::Csv => write_report_csv(&report, &path)?,
                ExportFormat::Txt => {
                    write_report_text(&report, &settings.currency_symbol, &path)?
                }
            };
            println!("Report exported to: {}", written.display());
        }
    }

    Ok(())
}

/// Default export file name, e.g. `report_2024-03.csv`
pub fn default_export_path(year: i32, month: u32, format: ExportFormat) -> PathBuf {
    PathBuf::from(format!(
        "report_{}-{:02}.{}",
        year,
        month,
        format.extension()
    ))
}

fn year_month_or_current(year: Option<i32>, month: Option<u32>) -> (i32, u32) {
    let today = Local::now().date_naive();
    (
        year.unwrap_or_else(|| today.year()),
        month.unwrap_or_else(|| today.month()),
    )
}
