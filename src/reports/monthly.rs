//! Monthly Report
//!
//! Aggregates one calendar month of expenses into per-category totals and
//! counts plus a grand total.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{TrackerError, TrackerResult};
use crate::models::Money;
use crate::services::ExpenseFilter;
use crate::storage::ExpenseStore;

/// Totals for a single category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category label as stored
    pub category: String,
    /// Sum of amounts
    pub amount: Money,
    /// Number of expenses
    pub count: usize,
}

/// Monthly Report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyReport {
    pub year: i32,
    /// Month number, 1-12
    pub month: u32,
    /// Per-category totals in first-seen order (newest expense first)
    pub categories: Vec<CategoryTotal>,
    /// Sum of every amount in the month
    pub total_spent: Money,
}

impl MonthlyReport {
    /// Generate the report for a calendar month
    ///
    /// Categories are grouped by their exact stored label and appear in the
    /// order they are first met while walking the month newest-first.
    pub fn generate(store: &ExpenseStore, year: i32, month: u32) -> TrackerResult<Self> {
        first_of_month(year, month)?;

        let expenses = ExpenseFilter::new()
            .year(year)
            .month(month)
            .apply(store.all());

        let mut categories: Vec<CategoryTotal> = Vec::new();
        let mut total_spent = Money::zero();

        let overflow = || {
            TrackerError::Validation(format!(
                "Totals for {}-{:02} exceed the supported amount range",
                year, month
            ))
        };

        for expense in &expenses {
            match categories
                .iter_mut()
                .find(|c| c.category == expense.category)
            {
                Some(total) => {
                    total.amount = total
                        .amount
                        .checked_add(expense.amount)
                        .ok_or_else(overflow)?;
                    total.count += 1;
                }
                None => categories.push(CategoryTotal {
                    category: expense.category.clone(),
                    amount: expense.amount,
                    count: 1,
                }),
            }
            total_spent = total_spent.checked_add(expense.amount).ok_or_else(overflow)?;
        }

        Ok(Self {
            year,
            month,
            categories,
            total_spent,
        })
    }

    /// Check if the month had no expenses
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Look up a category's totals by exact label
    pub fn category(&self, name: &str) -> Option<&CategoryTotal> {
        self.categories.iter().find(|c| c.category == name)
    }

    /// Full month name and year, e.g. "March 2024"
    pub fn month_name(&self) -> String {
        first_of_month(self.year, self.month)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|_| format!("{}-{:02}", self.year, self.month))
    }

    /// Categories ordered by descending amount; ties keep report order
    pub fn by_amount_desc(&self) -> Vec<&CategoryTotal> {
        let mut sorted: Vec<_> = self.categories.iter().collect();
        sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
        sorted
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();

        output.push_str(&format!("Report for {}\n", self.month_name()));
        output.push_str(&"-".repeat(40));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No expenses for this month.\n");
            return output;
        }

        for total in self.by_amount_desc() {
            output.push_str(&format!(
                "{:<20} {:>12}   ({} items)\n",
                total.category,
                total.amount.format_with_symbol(currency_symbol),
                total.count
            ));
        }

        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!(
            "Total Spent: {}\n",
            self.total_spent.format_with_symbol(currency_symbol)
        ));

        output
    }
}

fn first_of_month(year: i32, month: u32) -> TrackerResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        TrackerError::Validation(format!(
            "Invalid month: {}-{} (month must be 1-12)",
            year, month
        ))
    })
}
