//! Expense Tracker - personal expense tracking on a CSV file
//!
//! This library provides the core functionality for the `expenses` command
//! line tool. Expenses live in a plain CSV file, can be queried by year,
//! month and category, and are summarized into monthly per-category reports
//! that export as CSV or text.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, ids, money)
//! - `storage`: CSV file storage layer
//! - `services`: Validation and query logic
//! - `reports`: Monthly category report
//! - `export`: Report export to CSV and text
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_tracker::config::{paths::TrackerPaths, settings::Settings};
//! use expense_tracker::models::NewExpense;
//! use expense_tracker::services::ExpenseService;
//! use expense_tracker::storage::Storage;
//!
//! let paths = TrackerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::open(paths, settings.audit_enabled)?;
//! ExpenseService::new(&mut storage).add(NewExpense::new("12.50", "Food"))?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{TrackerError, TrackerResult};
