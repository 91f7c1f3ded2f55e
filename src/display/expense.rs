//! Expense display formatting
//!
//! Provides utilities for formatting expenses as a register-style listing.

use crate::models::Expense;

/// Format a single expense for display (list row)
pub fn format_expense_row(expense: &Expense, currency_symbol: &str) -> String {
    format!(
        "{:8}  {}  {:15} {:>12}  {}",
        expense.id.short(),
        expense.date_string(),
        truncate(&expense.category, 15),
        expense.amount.format_with_symbol(currency_symbol),
        expense.description
    )
    .trim_end()
    .to_string()
}

/// Format a list of expenses as a table
pub fn format_expense_list(expenses: &[Expense], currency_symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:8}  {:10}  {:15} {:>12}  {}\n",
        "ID", "Date", "Category", "Amount", "Description"
    ));
    output.push_str(&"-".repeat(64));
    output.push('\n');

    for expense in expenses {
        output.push_str(&format_expense_row(expense, currency_symbol));
        output.push('\n');
    }

    output
}

/// Format expense details for display
pub fn format_expense_details(expense: &Expense, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense:     {}\n", expense.id));
    output.push_str(&format!("Date:        {}\n", expense.date_string()));
    output.push_str(&format!(
        "Amount:      {}\n",
        expense.amount.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("Category:    {}\n", expense.category));

    if !expense.description.is_empty() {
        output.push_str(&format!("Description: {}\n", expense.description));
    }

    output
}

/// Pad or cut to `max_len` characters, marking cuts with "..."
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, Money};
    use chrono::NaiveDate;

    fn sample_expense(description: &str) -> Expense {
        Expense::new(
            ExpenseId::from("3f2a9c1e-0000-4000-8000-000000000000"),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            Money::from_cents(1250),
            "Food",
            description,
        )
    }

    #[test]
    fn test_format_expense_row() {
        let formatted = format_expense_row(&sample_expense("Lunch"), "₹");
        assert!(formatted.starts_with("3f2a9c1e"));
        assert!(formatted.contains("2024-03-15"));
        assert!(formatted.contains("Food"));
        assert!(formatted.contains("₹12.50"));
        assert!(formatted.ends_with("Lunch"));
    }

    #[test]
    fn test_format_empty_list() {
        let formatted = format_expense_list(&[], "₹");
        assert!(formatted.contains("No expenses found"));
    }

    #[test]
    fn test_format_expense_list() {
        let formatted = format_expense_list(&[sample_expense("")], "$");
        let lines: Vec<_> = formatted.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[2].contains("$12.50"));
    }

    #[test]
    fn test_format_expense_details() {
        let formatted = format_expense_details(&sample_expense("Lunch"), "₹");
        assert!(formatted.contains("3f2a9c1e-0000-4000-8000-000000000000"));
        assert!(formatted.contains("Description: Lunch"));

        let formatted = format_expense_details(&sample_expense(""), "₹");
        assert!(!formatted.contains("Description"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Short", 10).trim(), "Short");
        let result = truncate("Groceries and household", 10);
        assert_eq!(result.chars().count(), 10);
        assert!(result.ends_with("..."));
        assert_eq!(truncate("Café crème brûlée", 8), "Café ...");
    }
}
