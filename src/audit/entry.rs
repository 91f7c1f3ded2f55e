//! Audit entry data structures
//!
//! Defines the operations that are audited and the format of a single entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Expense;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Expense was added
    Create,
    /// Expense was deleted
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// Full id of the affected expense
    pub expense_id: String,

    /// One-line description, e.g. "2024-03-01 Food 12.50"
    pub summary: String,

    /// JSON snapshot of the expense
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl AuditEntry {
    fn new(operation: Operation, expense: &Expense) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            expense_id: expense.id.to_string(),
            summary: format!(
                "{} {} {}",
                expense.date_string(),
                expense.category,
                expense.amount
            ),
            data: serde_json::to_value(expense).ok(),
        }
    }

    /// Entry for an added expense
    pub fn create(expense: &Expense) -> Self {
        Self::new(Operation::Create, expense)
    }

    /// Entry for a deleted expense
    pub fn delete(expense: &Expense) -> Self {
        Self::new(Operation::Delete, expense)
    }

    /// Format the entry for terminal output
    pub fn format_line(&self) -> String {
        let short_id: String = self.expense_id.chars().take(8).collect();
        format!(
            "{} {:<6} [{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation.to_string(),
            short_id,
            self.summary
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, Money};
    use chrono::NaiveDate;

    fn sample() -> Expense {
        Expense::new(
            ExpenseId::from("0123456789abcdef"),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            Money::from_cents(1250),
            "Food",
            "lunch",
        )
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(&sample());
        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.expense_id, "0123456789abcdef");
        assert_eq!(entry.summary, "2024-03-01 Food 12.50");

        let data = entry.data.unwrap();
        assert_eq!(data["amount"], "12.50");
        assert_eq!(data["date"], "2024-03-01");
    }

    #[test]
    fn test_format_line() {
        let entry = AuditEntry::delete(&sample());
        let line = entry.format_line();
        assert!(line.contains("DELETE"));
        assert!(line.contains("[01234567]"));
        assert!(line.ends_with("2024-03-01 Food 12.50"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let entry = AuditEntry::create(&sample());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"operation\":\"create\""));

        let parsed: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.expense_id, entry.expense_id);
        assert_eq!(parsed.operation, Operation::Create);
    }
}
