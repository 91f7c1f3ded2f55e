//! Storage layer for the expense tracker
//!
//! Provides the CSV-backed expense store with atomic rewrites and automatic
//! directory creation, plus the optional audit trail.

pub mod expenses;
pub mod file_io;

pub use expenses::{ExpenseStore, LoadSummary, HEADER};
pub use file_io::{append_csv_row, write_csv_atomic};

use tracing::warn;

use crate::audit::{AuditEntry, AuditLogger};
use crate::config::paths::TrackerPaths;
use crate::error::TrackerError;
use crate::models::Expense;

/// Main storage coordinator: the expense store plus its audit log
pub struct Storage {
    paths: TrackerPaths,
    pub expenses: ExpenseStore,
    audit: Option<AuditLogger>,
}

impl Storage {
    /// Open storage, creating directories and the expense file as needed
    pub fn open(paths: TrackerPaths, audit_enabled: bool) -> Result<Self, TrackerError> {
        paths.ensure_directories()?;

        let expenses = ExpenseStore::open(paths.expenses_file())?;
        let audit = audit_enabled.then(|| AuditLogger::new(paths.audit_log()));

        Ok(Self {
            paths,
            expenses,
            audit,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &TrackerPaths {
        &self.paths
    }

    /// The audit logger, if auditing is enabled
    pub fn audit(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Record an added expense in the audit log
    ///
    /// Audit failures are logged and swallowed: the store write has already
    /// succeeded at this point.
    pub fn log_create(&self, expense: &Expense) {
        self.log_entry(AuditEntry::create(expense));
    }

    /// Record a deleted expense in the audit log
    pub fn log_delete(&self, expense: &Expense) {
        self.log_entry(AuditEntry::delete(expense));
    }

    fn log_entry(&self, entry: AuditEntry) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log(&entry) {
                warn!(id = %entry.expense_id, "Failed to write audit entry: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths, true).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("data").join("expenses.csv").exists());
        assert!(storage.expenses.is_empty());
        assert!(storage.audit().is_some());
    }

    #[test]
    fn test_audit_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let paths = TrackerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths, false).unwrap();
        assert!(storage.audit().is_none());
    }
}
