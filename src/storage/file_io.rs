//! File I/O utilities with atomic writes
//!
//! Provides the CSV file operations the expense store is built on. Full
//! rewrites go through a temp file and a rename so the store is either
//! completely written or not modified at all.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::TrackerError;

fn storage_err(action: &str, path: &Path, err: impl std::fmt::Display) -> TrackerError {
    TrackerError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Sibling temp path used while rewriting `path`
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("store"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn ensure_parent_dir(path: &Path) -> Result<(), TrackerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| storage_err("create directory", parent, e))?;
        }
    }
    Ok(())
}

/// Write CSV rows to a file atomically (write to temp, then rename)
///
/// The first row is written like any other, so callers pass the header in
/// `rows`. Parent directories are created as needed.
pub fn write_csv_atomic<P, I, R, T>(path: P, rows: I) -> Result<(), TrackerError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    // Temp file lives in the same directory so the rename stays atomic
    let temp_path = temp_path_for(path);

    let result = write_rows(&temp_path, rows).and_then(|()| {
        fs::rename(&temp_path, path).map_err(|e| storage_err("replace", path, e))
    });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_rows<I, R, T>(temp_path: &Path, rows: I) -> Result<(), TrackerError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let file = File::create(temp_path).map_err(|e| storage_err("create", temp_path, e))?;
    let mut writer = csv::Writer::from_writer(file);

    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| storage_err("write", temp_path, e))?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| storage_err("flush", temp_path, e.error()))?;

    // Sync to disk before rename
    file.sync_all()
        .map_err(|e| storage_err("sync", temp_path, e))?;

    Ok(())
}

/// Append a single CSV row to the end of an existing file
///
/// If the file does not end with a line break (e.g. it was edited by hand),
/// one is inserted first so the new row starts on its own line.
pub fn append_csv_row<P, R, T>(path: P, row: R) -> Result<(), TrackerError>
where
    P: AsRef<Path>,
    R: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let path = path.as_ref();

    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| storage_err("open", path, e))?;

    if needs_line_break(&mut file).map_err(|e| storage_err("read", path, e))? {
        file.write_all(b"\n")
            .map_err(|e| storage_err("write", path, e))?;
    }

    let mut writer = csv::Writer::from_writer(file);
    writer
        .write_record(row)
        .map_err(|e| storage_err("write", path, e))?;
    writer.flush().map_err(|e| storage_err("flush", path, e))?;

    Ok(())
}

fn needs_line_break(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Write `header` as the only row if `path` is missing or zero-length
///
/// Returns `true` if the header was written, `false` if the file already had
/// content.
pub fn write_header_if_empty<P, R, T>(path: P, header: R) -> Result<bool, TrackerError>
where
    P: AsRef<Path>,
    R: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(meta) if meta.len() > 0 => return Ok(false),
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(storage_err("inspect", path, e)),
    }
    write_csv_atomic(path, std::iter::once(header))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: [&str; 2] = ["name", "value"];

    #[test]
    fn test_write_and_read_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.csv");

        write_csv_atomic(&path, vec![vec!["name", "value"], vec!["a, b", "1"]]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "name,value\n\"a, b\",1\n");
    }

    #[test]
    fn test_atomic_write_no_temp_file_left() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.csv");

        write_csv_atomic(&path, vec![HEADER]).unwrap();

        assert!(path.exists());
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_failed_rename_cleans_up_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.csv");
        // A non-empty directory in the way makes the rename fail
        fs::create_dir(&path).unwrap();
        fs::write(path.join("blocker"), "x").unwrap();

        let err = write_csv_atomic(&path, vec![HEADER]).unwrap_err();
        assert!(err.is_storage());
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("dir").join("test.csv");

        write_csv_atomic(&path, vec![HEADER]).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_header_if_empty_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.csv");

        assert!(write_header_if_empty(&path, HEADER).unwrap());
        append_csv_row(&path, ["x", "1"]).unwrap();
        assert!(!write_header_if_empty(&path, HEADER).unwrap());

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "name,value\nx,1\n");
    }

    #[test]
    fn test_write_header_into_zero_length_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.csv");
        fs::write(&path, "").unwrap();

        assert!(write_header_if_empty(&path, HEADER).unwrap());
        append_csv_row(&path, ["x", "1"]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "name,value\nx,1\n");
    }

    #[test]
    fn test_append_adds_missing_line_break() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.csv");
        fs::write(&path, "name,value\nx,1").unwrap();

        append_csv_row(&path, ["y", "2"]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "name,value\nx,1\ny,2\n");
    }

    #[test]
    fn test_append_to_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.csv");

        let err = append_csv_row(&path, ["y", "2"]).unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let path = Path::new("/data/expenses.csv");
        assert_eq!(temp_path_for(path), Path::new("/data/expenses.csv.tmp"));
    }
}
