//! CLI command for the audit trail

use crate::error::TrackerResult;
use crate::storage::Storage;

/// Show the most recent audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, count: usize) -> TrackerResult<()> {
    let Some(logger) = storage.audit() else {
        println!("Audit logging is disabled.");
        return Ok(());
    };

    let entries = logger.read_recent(count)?;
    if entries.is_empty() {
        println!("No audit entries yet.");
        return Ok(());
    }

    for entry in entries {
        println!("{}", entry.format_line());
    }

    Ok(())
}
