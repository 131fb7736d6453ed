//! JSON file handling for rate tables, balances, configuration and logs
//!
//! All persisted state is plain JSON. Writes go through a sibling temp file
//! followed by a rename so a reader never observes a half-written file.

use crate::types::{LedgerError, RateTable};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Load a JSON file that must exist and decode
///
/// # Errors
///
/// - `FileNotFound` if the path does not exist
/// - `IoError` if the file cannot be read
/// - `ParseError` if the content is not valid JSON for `T`
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LedgerError> {
    if !path.exists() {
        return Err(LedgerError::file_not_found(path));
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| LedgerError::ParseError {
        message: format!("{}: {}", path.display(), e),
    })
}

/// Load a JSON file that may be absent
///
/// A missing or empty file yields `T::default()`.
///
/// # Errors
///
/// - `IoError` if the file cannot be read
/// - `ParseError` if the file holds content that does not decode
pub fn load_json_if_present<T: DeserializeOwned + Default>(path: &Path) -> Result<T, LedgerError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "File absent, using defaults");
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_json::from_str(&content).map_err(|e| LedgerError::ParseError {
        message: format!("{}: {}", path.display(), e),
    })
}

/// Load a JSON file, falling back to `T::default()` when it is missing,
/// empty, or does not decode
///
/// Only genuine read failures (permissions, I/O) are returned as errors.
pub fn load_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T, LedgerError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "File absent, using defaults");
        return Ok(T::default());
    }

    let content = fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }

    match serde_json::from_str(&content) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Undecodable JSON, using defaults");
            Ok(T::default())
        }
    }
}

/// Write `value` as pretty JSON (two-space indent), atomically replacing `path`
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let content = serde_json::to_string_pretty(value)?;
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// Load the rate table; it is the one input with no sensible default
pub fn load_rate_table(path: &Path) -> Result<RateTable, LedgerError> {
    let table: RateTable = load_json(path)?;
    // Surface an empty table at load time rather than on the first request
    table.latest()?;
    Ok(table)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
