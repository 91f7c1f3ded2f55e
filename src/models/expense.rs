//! Expense model
//!
//! A single logged spending event. Expenses are immutable once created: the
//! only lifecycle events are creation via [`Expense::from_input`] (or loading
//! from the store) and removal.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;
use crate::error::{TrackerError, TrackerResult};

/// Fixed textual date format used in the store, exports and CLI input
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date string
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Raw, unvalidated input for a new expense
#[derive(Debug, Clone, Default)]
pub struct NewExpense {
    /// Amount as typed by the user, e.g. "12.50"
    pub amount: String,
    pub category: String,
    /// `YYYY-MM-DD`, or `None` for today
    pub date: Option<String>,
    pub description: Option<String>,
}

impl NewExpense {
    /// Create input with the required fields
    pub fn new(amount: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
            date: None,
            description: None,
        }
    }

    /// Set the date string
    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Date the money was spent
    pub date: NaiveDate,

    /// Amount, exact to the cent
    pub amount: Money,

    /// Category label (trimmed, case preserved)
    pub category: String,

    /// Free-text notes, may be empty
    #[serde(default)]
    pub description: String,
}

impl Expense {
    /// Build an expense from already-validated parts, trimming the text fields
    pub fn new(
        id: ExpenseId,
        date: NaiveDate,
        amount: Money,
        category: impl AsRef<str>,
        description: impl AsRef<str>,
    ) -> Self {
        Self {
            id,
            date,
            amount,
            category: category.as_ref().trim().to_string(),
            description: description.as_ref().trim().to_string(),
        }
    }

    /// Validate raw input and create an expense with a fresh id
    ///
    /// `today` is used when the input carries no date.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] naming the offending value when the
    /// date is not a valid `YYYY-MM-DD` calendar date or the amount is not a number.
    pub fn from_input(input: NewExpense, today: NaiveDate) -> TrackerResult<Self> {
        let date = match input.date.as_deref() {
            None => today,
            Some(raw) => parse_date(raw).ok_or_else(|| {
                TrackerError::Validation(format!(
                    "Date must be in YYYY-MM-DD format. Got: {}",
                    raw
                ))
            })?,
        };

        let amount =
            Money::parse(&input.amount).map_err(|e| TrackerError::Validation(e.to_string()))?;

        Ok(Self::new(
            ExpenseId::new(),
            date,
            amount,
            &input.category,
            input.description.as_deref().unwrap_or_default(),
        ))
    }

    /// Date in the fixed `YYYY-MM-DD` form
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Check whether the expense falls in the given calendar year
    pub fn in_year(&self, year: i32) -> bool {
        self.date.year() == year
    }

    /// Check whether the expense falls in the given calendar month (1-12)
    pub fn in_month(&self, month: u32) -> bool {
        self.date.month() == month
    }

    /// Case-insensitive category comparison
    pub fn category_matches(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.trim().to_lowercase()
    }

    /// Fields in store column order: id, date, amount, category, description
    pub fn to_row(&self) -> [String; 5] {
        [
            self.id.to_string(),
            self.date_string(),
            self.amount.to_string(),
            self.category.clone(),
            self.description.clone(),
        ]
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}",
            self.date_string(),
            self.category,
            self.amount,
            self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_from_input_full() {
        let input = NewExpense::new("12.5", "  Food ")
            .date("2024-03-01")
            .description("  lunch  ");
        let expense = Expense::from_input(input, today()).unwrap();

        assert_eq!(expense.amount.cents(), 1250);
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.description, "lunch");
        assert_eq!(expense.date_string(), "2024-03-01");
        assert!(!expense.id.as_str().is_empty());
    }

    #[test]
    fn test_from_input_defaults_to_today() {
        let expense = Expense::from_input(NewExpense::new("1", "Misc"), today()).unwrap();
        assert_eq!(expense.date, today());
        assert_eq!(expense.description, "");
    }

    #[test]
    fn test_invalid_date_rejected() {
        let input = NewExpense::new("10", "Food").date("2024-13-01");
        let err = Expense::from_input(input, today()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("2024-13-01"));

        let input = NewExpense::new("10", "Food").date("2023-02-29");
        assert!(Expense::from_input(input, today()).is_err());
    }

    #[test]
    fn test_invalid_amount_rejected() {
        let err = Expense::from_input(NewExpense::new("abc", "Food"), today()).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_amount_rounding() {
        let expense = Expense::from_input(NewExpense::new("50.005", "Food"), today()).unwrap();
        assert_eq!(expense.amount.to_string(), "50.01");
    }

    #[test]
    fn test_fresh_ids() {
        let a = Expense::from_input(NewExpense::new("1", "A"), today()).unwrap();
        let b = Expense::from_input(NewExpense::new("1", "A"), today()).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_category_matches_ignores_case() {
        let expense = Expense::from_input(NewExpense::new("1", "Food"), today()).unwrap();
        assert!(expense.category_matches("food"));
        assert!(expense.category_matches(" FOOD "));
        assert!(!expense.category_matches("Foods"));
    }

    #[test]
    fn test_to_row() {
        let expense = Expense::new(
            ExpenseId::from("id-1"),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            Money::from_cents(-705),
            "Refund",
            "",
        );
        assert_eq!(
            expense.to_row(),
            [
                "id-1".to_string(),
                "2024-03-05".to_string(),
                "-7.05".to_string(),
                "Refund".to_string(),
                String::new(),
            ]
        );
    }

    #[test]
    fn test_display() {
        let expense = Expense::new(
            ExpenseId::from("id-1"),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            Money::from_cents(1999),
            "Books",
            "novel",
        );
        assert_eq!(expense.to_string(), "2024-03-05 | Books | 19.99 | novel");
    }
}
