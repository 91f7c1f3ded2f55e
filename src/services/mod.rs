//! Service layer for the expense tracker
//!
//! Services sit between the CLI and storage, holding the validation and
//! filtering rules.

pub mod expense;

pub use expense::{ExpenseFilter, ExpenseService};
