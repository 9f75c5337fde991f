//! Backup artifacts: a pretty JSON snapshot of the whole collection, and a
//! flat CSV listing for spreadsheets.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::history::sort_newest_first;
use crate::models::Transaction;

const BACKUP_PREFIX: &str = "expz-backup";

/// Every field of every transaction as a 2-space indented JSON array.
pub(crate) fn serialize(transactions: &[Transaction]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(transactions).context("Failed to serialize transactions")
}

pub(crate) fn backup_file_name(date: NaiveDate) -> String {
    format!("{BACKUP_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}

/// Write a serialized snapshot into `dir`, replacing any backup from the
/// same day.
pub(crate) fn write_backup(snapshot: &[u8], dir: &Path, today: NaiveDate) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory: {}", dir.display()))?;
    let path = dir.join(backup_file_name(today));
    std::fs::write(&path, snapshot)
        .with_context(|| format!("Failed to write backup: {}", path.display()))?;
    info!(path = %path.display(), bytes = snapshot.len(), "wrote backup");
    Ok(path)
}

/// Write `id,date_time,text,amount` rows, newest first. Returns the row count.
pub(crate) fn write_csv<'a, I>(transactions: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let rows = sort_newest_first(transactions);
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    wtr.write_record(["id", "date_time", "text", "amount"])?;
    for txn in &rows {
        wtr.write_record([
            txn.id.to_string(),
            txn.date_time.clone(),
            txn.text.clone(),
            format!("{:.2}", txn.amount),
        ])?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), count = rows.len(), "wrote csv export");
    Ok(rows.len())
}

/// Default CSV file name for a month key, or the whole collection.
pub(crate) fn csv_file_name(month: Option<&str>) -> String {
    format!("expz-export-{}.csv", month.unwrap_or("all"))
}
