//! Expense store backed by a flat CSV file
//!
//! The store keeps every expense in memory, in file order, and mirrors each
//! mutation to disk before reporting success. Adds append a single row; the
//! only path that removes rows from the file is a full rewrite.
//!
//! Rows that fail validation on load (unparsable amount or date, missing id,
//! duplicate id) are skipped rather than failing the load. The number of
//! skipped rows is reported through [`LoadSummary`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{TrackerError, TrackerResult};
use crate::models::{parse_date, Expense, ExpenseId, Money};

use super::file_io::{append_csv_row, write_csv_atomic, write_header_if_empty};

/// Column names of the backing file, in order
pub const HEADER: [&str; 5] = ["id", "date", "amount", "category", "description"];

/// Outcome of reading the backing file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Rows accepted into memory
    pub loaded: usize,
    /// Rows dropped by validation
    pub skipped: usize,
}

/// Column positions resolved from the header row
struct Columns {
    id: Option<usize>,
    date: Option<usize>,
    amount: Option<usize>,
    category: Option<usize>,
    description: Option<usize>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Self {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);
        Self {
            id: find("id"),
            date: find("date"),
            amount: find("amount"),
            category: find("category"),
            description: find("description"),
        }
    }

    /// Names of the columns a row cannot be read without
    fn missing_required(&self) -> Vec<&'static str> {
        [("id", self.id), ("date", self.date), ("amount", self.amount)]
            .into_iter()
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| name)
            .collect()
    }

    fn field<'r>(record: &'r csv::StringRecord, idx: Option<usize>) -> Option<&'r str> {
        idx.and_then(|i| record.get(i))
    }

    /// Validate one row, returning the reason it was rejected
    fn parse(&self, record: &csv::StringRecord) -> Result<Expense, String> {
        let id = Self::field(record, self.id)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or("missing id")?;

        let raw_amount = Self::field(record, self.amount).ok_or("missing amount")?;
        let amount =
            Money::parse(raw_amount).map_err(|_| format!("invalid amount '{}'", raw_amount))?;

        let raw_date = Self::field(record, self.date).ok_or("missing date")?;
        let date = parse_date(raw_date).ok_or_else(|| format!("invalid date '{}'", raw_date))?;

        Ok(Expense::new(
            ExpenseId::from(id),
            date,
            amount,
            Self::field(record, self.category).unwrap_or_default(),
            Self::field(record, self.description).unwrap_or_default(),
        ))
    }
}

/// In-memory mirror of the expense file
#[derive(Debug)]
pub struct ExpenseStore {
    path: PathBuf,
    expenses: Vec<Expense>,
    last_load: LoadSummary,
    /// Whether the file's header is exactly [`HEADER`], so rows can be appended
    header_matches: bool,
}

impl ExpenseStore {
    /// Create an empty store for `path` without touching the file system
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            expenses: Vec::new(),
            last_load: LoadSummary::default(),
            header_matches: true,
        }
    }

    /// Create the backing file if needed and load it
    pub fn open(path: impl Into<PathBuf>) -> TrackerResult<Self> {
        let mut store = Self::new(path);
        store.ensure_store()?;
        store.load()?;
        Ok(store)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the header row if the backing file is missing or empty
    ///
    /// Returns `true` if the header was written.
    pub fn ensure_store(&self) -> TrackerResult<bool> {
        let created = write_header_if_empty(&self.path, HEADER)?;
        if created {
            info!(path = %self.path.display(), "Created expense store");
        }
        Ok(created)
    }

    /// Replace the in-memory set with the contents of the backing file
    ///
    /// Malformed rows are skipped and counted; only file-level failures
    /// (missing or unreadable file) are errors.
    pub fn load(&mut self) -> TrackerResult<LoadSummary> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| {
                TrackerError::Storage(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        let header = reader.headers().cloned().map_err(|e| {
            TrackerError::Storage(format!(
                "Failed to read header of {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let columns = Columns::from_header(&header);
        let missing = columns.missing_required();
        if !missing.is_empty() {
            return Err(TrackerError::Storage(format!(
                "{} is missing required column(s): {}",
                self.path.display(),
                missing.join(", ")
            )));
        }
        let header_matches = header.iter().map(str::trim).eq(HEADER);

        let mut expenses = Vec::new();
        let mut seen = HashSet::new();
        let mut summary = LoadSummary::default();

        for result in reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    if e.is_io_error() {
                        return Err(TrackerError::Storage(format!(
                            "Failed to read {}: {}",
                            self.path.display(),
                            e
                        )));
                    }
                    warn!("Skipping unreadable row: {}", e);
                    summary.skipped += 1;
                    continue;
                }
            };

            let line = record.position().map(|p| p.line()).unwrap_or_default();
            match columns.parse(&record) {
                Ok(expense) if !seen.insert(expense.id.clone()) => {
                    warn!(line, id = %expense.id, "Skipping row with duplicate id");
                    summary.skipped += 1;
                }
                Ok(expense) => {
                    expenses.push(expense);
                    summary.loaded += 1;
                }
                Err(reason) => {
                    warn!(line, "Skipping row: {}", reason);
                    summary.skipped += 1;
                }
            }
        }

        debug!(
            path = %self.path.display(),
            loaded = summary.loaded,
            skipped = summary.skipped,
            "Loaded expense store"
        );

        self.expenses = expenses;
        self.last_load = summary;
        self.header_matches = header_matches;
        Ok(summary)
    }

    /// Summary of the most recent [`load`](Self::load)
    pub fn last_load(&self) -> LoadSummary {
        self.last_load
    }

    /// Append one expense to the file, then to memory
    ///
    /// A file whose header differs from [`HEADER`] (reordered or extra
    /// columns) is rewritten in the standard layout instead.
    pub fn append(&mut self, expense: Expense) -> TrackerResult<()> {
        if self.get(&expense.id).is_some() {
            return Err(TrackerError::Storage(format!(
                "Expense id already exists: {}",
                expense.id
            )));
        }

        if self.header_matches {
            append_csv_row(&self.path, expense.to_row())?;
            debug!(id = %expense.id, "Appended expense");
            self.expenses.push(expense);
            return Ok(());
        }

        self.expenses.push(expense);
        if let Err(e) = self.rewrite() {
            self.expenses.pop();
            return Err(e);
        }
        self.header_matches = true;
        Ok(())
    }

    /// Overwrite the file with the header and every in-memory expense, in order
    pub fn rewrite(&self) -> TrackerResult<()> {
        let rows = std::iter::once(HEADER.map(String::from))
            .chain(self.expenses.iter().map(Expense::to_row));
        write_csv_atomic(&self.path, rows)?;
        debug!(count = self.expenses.len(), "Rewrote expense store");
        Ok(())
    }

    /// Remove the expense with exactly this id and rewrite the file
    ///
    /// Returns the removed expense, or `None` (without touching the file) if
    /// no expense has that id. If the rewrite fails the expense is put back
    /// so memory keeps matching disk.
    pub fn remove(&mut self, id: &ExpenseId) -> TrackerResult<Option<Expense>> {
        let Some(index) = self.expenses.iter().position(|e| &e.id == id) else {
            return Ok(None);
        };

        let removed = self.expenses.remove(index);
        if let Err(e) = self.rewrite() {
            self.expenses.insert(index, removed);
            return Err(e);
        }
        self.header_matches = true;

        Ok(Some(removed))
    }

    /// All expenses in file order
    pub fn all(&self) -> &[Expense] {
        &self.expenses
    }

    /// Get an expense by exact id
    pub fn get(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| &e.id == id)
    }

    /// Expenses whose id starts with `prefix`
    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|e| e.id.starts_with(prefix))
            .collect()
    }

    /// Number of expenses in memory
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    /// Check if the store holds no expenses
    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, ExpenseStore) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.csv");
        let store = ExpenseStore::open(path).unwrap();
        (temp_dir, store)
    }

    fn expense(id: &str, date: (i32, u32, u32), cents: i64, category: &str) -> Expense {
        Expense::new(
            ExpenseId::from(id),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            Money::from_cents(cents),
            category,
            "",
        )
    }

    #[test]
    fn test_open_creates_file_with_header() {
        let (_temp_dir, store) = create_test_store();
        assert!(store.is_empty());

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "id,date,amount,category,description\n");
    }

    #[test]
    fn test_ensure_store_is_idempotent() {
        let (_temp_dir, mut store) = create_test_store();
        store.append(expense("a", (2024, 3, 1), 100, "Food")).unwrap();

        assert!(!store.ensure_store().unwrap());
        let summary = store.load().unwrap();
        assert_eq!(summary.loaded, 1);
    }

    #[test]
    fn test_append_and_reload() {
        let (_temp_dir, mut store) = create_test_store();
        store.append(expense("a", (2024, 3, 1), 10000, "Food")).unwrap();
        store.append(expense("b", (2024, 3, 2), 2000, "Transport")).unwrap();

        let reloaded = ExpenseStore::open(store.path()).unwrap();
        assert_eq!(reloaded.all(), store.all());
        assert_eq!(reloaded.last_load(), LoadSummary { loaded: 2, skipped: 0 });
    }

    #[test]
    fn test_append_duplicate_id_rejected() {
        let (_temp_dir, mut store) = create_test_store();
        store.append(expense("a", (2024, 3, 1), 100, "Food")).unwrap();
        assert!(store.append(expense("a", (2024, 3, 2), 200, "Food")).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_text_with_delimiters_survives_round_trip() {
        let (_temp_dir, mut store) = create_test_store();
        let tricky = Expense::new(
            ExpenseId::from("q"),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            Money::from_cents(1),
            "Food, drinks",
            "said \"hi\"\nthen left",
        );
        store.append(tricky.clone()).unwrap();

        let reloaded = ExpenseStore::open(store.path()).unwrap();
        assert_eq!(reloaded.all(), &[tricky]);
    }

    #[test]
    fn test_load_skips_malformed_rows() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.csv");
        fs::write(
            &path,
            "id,date,amount,category,description\n\
             good,2024-03-01,12.5,Food,lunch\n\
             bad-amount,2024-03-02,abc,Food,\n\
             bad-date,2024-02-30,5.00,Food,\n\
             short,2024-03-03\n\
             ,2024-03-04,1.00,Food,\n\
             good,2024-03-05,1.00,Food,duplicate\n\
             also-good,2024-03-06,-3,Refund,\n",
        )
        .unwrap();

        let store = ExpenseStore::open(&path).unwrap();
        let summary = store.last_load();
        assert_eq!(summary, LoadSummary { loaded: 2, skipped: 5 });

        let ids: Vec<_> = store.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["good", "also-good"]);
        assert_eq!(store.all()[0].amount.to_string(), "12.50");
    }

    #[test]
    fn test_load_uses_header_names() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.csv");
        fs::write(
            &path,
            "date,id,category,amount,description\n2024-03-01,x1, Food ,7,  note \n",
        )
        .unwrap();

        let store = ExpenseStore::open(&path).unwrap();
        let e = &store.all()[0];
        assert_eq!(e.id.as_str(), "x1");
        assert_eq!(e.category, "Food");
        assert_eq!(e.description, "note");
        assert_eq!(e.amount.cents(), 700);
    }

    #[test]
    fn test_zero_length_file_gets_header() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.csv");
        fs::write(&path, "").unwrap();

        let mut store = ExpenseStore::open(&path).unwrap();
        store.append(expense("a", (2024, 3, 1), 100, "Food")).unwrap();
        store.append(expense("b", (2024, 3, 2), 200, "Food")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,date,amount,category,description\n"));

        let reloaded = ExpenseStore::open(&path).unwrap();
        assert_eq!(reloaded.all(), store.all());
        assert_eq!(reloaded.last_load(), LoadSummary { loaded: 2, skipped: 0 });
    }

    #[test]
    fn test_header_without_required_columns_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.csv");
        fs::write(&path, "a,2024-03-01,1.00,Food,\n").unwrap();

        let err = ExpenseStore::open(&path).unwrap_err();
        assert!(err.is_storage());
        assert!(err.to_string().contains("id, date, amount"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "a,2024-03-01,1.00,Food,\n");
    }

    #[test]
    fn test_append_to_reordered_header_rewrites_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("expenses.csv");
        fs::write(&path, "date,id,amount,category,description\n2024-03-01,x1,7,Food,\n").unwrap();

        let mut store = ExpenseStore::open(&path).unwrap();
        store.append(expense("x2", (2024, 3, 2), 200, "Food")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("id,date,amount,category,description\n"));

        let reloaded = ExpenseStore::open(&path).unwrap();
        let ids: Vec<_> = reloaded.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["x1", "x2"]);
    }

    #[test]
    fn test_remove_rewrites_file() {
        let (_temp_dir, mut store) = create_test_store();
        store.append(expense("a", (2024, 3, 1), 100, "Food")).unwrap();
        store.append(expense("b", (2024, 3, 2), 200, "Food")).unwrap();
        store.append(expense("c", (2024, 3, 3), 300, "Food")).unwrap();

        let removed = store.remove(&ExpenseId::from("b")).unwrap();
        assert_eq!(removed.map(|e| e.amount.cents()), Some(200));

        let reloaded = ExpenseStore::open(store.path()).unwrap();
        let ids: Vec<_> = reloaded.all().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_remove_missing_leaves_file_untouched() {
        let (_temp_dir, mut store) = create_test_store();
        store.append(expense("a", (2024, 3, 1), 100, "Food")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        assert!(store.remove(&ExpenseId::from("zzz")).unwrap().is_none());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_failed_rewrite_keeps_memory_in_sync() {
        let (_temp_dir, mut store) = create_test_store();
        store.append(expense("a", (2024, 3, 1), 100, "Food")).unwrap();

        // Replace the file with a directory so the rename fails
        fs::remove_file(store.path()).unwrap();
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("blocker"), "x").unwrap();

        let err = store.remove(&ExpenseId::from("a")).unwrap_err();
        assert!(err.is_storage());
        assert_eq!(store.len(), 1);
        assert!(store.get(&ExpenseId::from("a")).is_some());
    }

    #[test]
    fn test_failed_append_leaves_memory_unchanged() {
        let (_temp_dir, mut store) = create_test_store();
        fs::remove_file(store.path()).unwrap();
        fs::create_dir(store.path()).unwrap();

        assert!(store.append(expense("a", (2024, 3, 1), 100, "Food")).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_find_by_prefix() {
        let (_temp_dir, mut store) = create_test_store();
        store.append(expense("abc1", (2024, 3, 1), 100, "Food")).unwrap();
        store.append(expense("abd2", (2024, 3, 1), 100, "Food")).unwrap();

        assert_eq!(store.find_by_prefix("ab").len(), 2);
        assert_eq!(store.find_by_prefix("abc").len(), 1);
        assert!(store.find_by_prefix("x").is_empty());
    }
}
