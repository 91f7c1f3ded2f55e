//! Expense service
//!
//! Business logic for recording, listing and deleting expenses. All
//! mutations go through the [`ExpenseStore`](crate::storage::ExpenseStore),
//! which keeps memory and disk in step; the service adds validation,
//! filtering and the audit trail on top.

use chrono::{Local, NaiveDate};
use tracing::{debug, info};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{Expense, ExpenseId, NewExpense};
use crate::storage::Storage;

/// Options for filtering expenses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Calendar year of the expense date
    pub year: Option<i32>,
    /// Calendar month (1-12) of the expense date
    pub month: Option<u32>,
    /// Category, matched case-insensitively
    pub category: Option<String>,
    /// Maximum number of expenses to return; 0 means no limit
    pub limit: Option<usize>,
}

impl ExpenseFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by year
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Filter by month
    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    /// Filter by category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, expense: &Expense) -> bool {
        self.year.map_or(true, |y| expense.in_year(y))
            && self.month.map_or(true, |m| expense.in_month(m))
            && self
                .category
                .as_deref()
                .map_or(true, |c| expense.category_matches(c))
    }

    /// Select matching expenses, newest first
    ///
    /// The sort is stable, so expenses sharing a date keep their store order.
    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        let mut results: Vec<Expense> = expenses
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect();

        results.sort_by(|a, b| b.date.cmp(&a.date));

        if let Some(limit) = self.limit.filter(|&l| l > 0) {
            results.truncate(limit);
        }

        results
    }
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a mut Storage,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a mut Storage) -> Self {
        Self { storage }
    }

    /// Validate and record a new expense dated today unless the input says otherwise
    pub fn add(&mut self, input: NewExpense) -> TrackerResult<Expense> {
        self.add_as_of(input, Local::now().date_naive())
    }

    /// Validate and record a new expense, using `today` when the input has no date
    ///
    /// Nothing is written when validation fails.
    pub fn add_as_of(&mut self, input: NewExpense, today: NaiveDate) -> TrackerResult<Expense> {
        let expense = Expense::from_input(input, today)?;

        self.storage.expenses.append(expense.clone())?;
        self.storage.log_create(&expense);

        info!(id = %expense.id, category = %expense.category, amount = %expense.amount, "Added expense");
        Ok(expense)
    }

    /// List expenses matching the filter, newest first
    pub fn list(&self, filter: &ExpenseFilter) -> Vec<Expense> {
        let results = filter.apply(self.storage.expenses.all());
        debug!(?filter, count = results.len(), "Listed expenses");
        results
    }

    /// Get an expense by exact id
    pub fn get(&self, id: &ExpenseId) -> Option<Expense> {
        self.storage.expenses.get(id).cloned()
    }

    /// Delete the expense with exactly this id
    ///
    /// Returns `false` (and leaves the store untouched) if no such expense exists.
    pub fn delete(&mut self, id: &ExpenseId) -> TrackerResult<bool> {
        match self.storage.expenses.remove(id)? {
            Some(removed) => {
                self.storage.log_delete(&removed);
                info!(id = %removed.id, "Deleted expense");
                Ok(true)
            }
            None => {
                debug!(%id, "No expense to delete");
                Ok(false)
            }
        }
    }

    /// Expand an id prefix to the single full id it identifies
    ///
    /// # Errors
    ///
    /// - [`TrackerError::Validation`] for an empty prefix
    /// - [`TrackerError::NotFound`] when nothing matches
    /// - [`TrackerError::AmbiguousId`] when several expenses match
    pub fn resolve_prefix(&self, prefix: &str) -> TrackerResult<ExpenseId> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(TrackerError::Validation("No id entered".into()));
        }

        let matches = self.storage.expenses.find_by_prefix(prefix);
        match matches.as_slice() {
            [] => Err(TrackerError::expense_not_found(prefix)),
            [only] => Ok(only.id.clone()),
            many => Err(TrackerError::AmbiguousId {
                prefix: prefix.to_string(),
                candidates: many.iter().map(|e| e.id.to_string()).collect(),
            }),
        }
    }
}
