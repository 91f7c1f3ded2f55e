//! Reports module for the expense tracker
//!
//! Provides the monthly per-category spending report.

pub mod monthly;

pub use monthly::{CategoryTotal, MonthlyReport};
