//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::LedgerError;

/// Read JSON from a file, returning `None` if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<Option<T>, LedgerError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)
        .map_err(|e| LedgerError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map(Some)
        .map_err(|e| LedgerError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), LedgerError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target, otherwise rename is not atomic
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| LedgerError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| LedgerError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| LedgerError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| LedgerError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        LedgerError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Move an unreadable file out of the way so the next write cannot clobber it
///
/// The file is renamed to `<name>.corrupt-<timestamp>` in the same directory.
/// Returns the new location.
pub fn preserve_corrupt<P: AsRef<Path>>(path: P) -> Result<PathBuf, LedgerError> {
    let path = path.as_ref();
    let target = timestamped_sibling(path, "corrupt");

    fs::rename(path, &target).map_err(|e| {
        LedgerError::Storage(format!(
            "Failed to move corrupt file {} aside: {}",
            path.display(),
            e
        ))
    })?;

    Ok(target)
}

/// Copy a file to `<name>.<label>-<timestamp>` next to it, leaving the original in place
pub fn preserve_copy<P: AsRef<Path>>(path: P, label: &str) -> Result<PathBuf, LedgerError> {
    let path = path.as_ref();
    let target = timestamped_sibling(path, label);

    fs::copy(path, &target).map_err(|e| {
        LedgerError::Storage(format!("Failed to copy {}: {}", path.display(), e))
    })?;

    Ok(target)
}

fn timestamped_sibling(path: &Path, label: &str) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "ledger".to_string());

    let now = Utc::now();
    path.with_file_name(format!(
        "{}.{}-{}-{:03}",
        file_name,
        label,
        now.format("%Y%m%d-%H%M%S"),
        now.timestamp_subsec_millis()
    ))
}
