//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod expense;
pub mod report;

pub use audit::handle_audit_command;
pub use expense::{handle_expense_command, ExpenseCommands};
pub use report::{handle_report_command, ExportFormat, ReportCommands};
