//! Core data models for the expense tracker
//!
//! This module contains the data structures that represent a logged expense:
//! its identifier, its money amount, and the record itself.

pub mod expense;
pub mod ids;
pub mod money;

pub use expense::{parse_date, Expense, NewExpense, DATE_FORMAT};
pub use ids::ExpenseId;
pub use money::{Money, MoneyParseError};
