//! Path management for the bank ledger
//!
//! All files live in a single data directory.
//!
//! ## Path Resolution Order
//!
//! 1. An explicit directory (the `--data-dir` flag)
//! 2. `BANK_LEDGER_DIR` environment variable (if set)
//! 3. The current working directory

use std::path::PathBuf;

use crate::error::LedgerError;

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "BANK_LEDGER_DIR";

/// Manages all paths used by the ledger
#[derive(Debug, Clone)]
pub struct LedgerPaths {
    /// Directory holding the ledger, audit log and settings
    base_dir: PathBuf,
}

impl LedgerPaths {
    /// Resolve the data directory
    ///
    /// # Errors
    ///
    /// Returns an error if no override is given and the current working
    /// directory cannot be determined.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, LedgerError> {
        let base_dir = match explicit {
            Some(dir) => dir,
            None => match std::env::var_os(DATA_DIR_ENV) {
                Some(custom) if !custom.is_empty() => PathBuf::from(custom),
                _ => std::env::current_dir().map_err(|e| {
                    LedgerError::Config(format!("Could not determine working directory: {}", e))
                })?,
            },
        };

        Ok(Self { base_dir })
    }

    /// Create LedgerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to accounts.json
    pub fn accounts_file(&self) -> PathBuf {
        self.base_dir.join("accounts.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    /// Ensure the data directory exists
    pub fn ensure_directories(&self) -> Result<(), LedgerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LedgerError::Io(format!("Failed to create data directory: {}", e)))
    }
}
