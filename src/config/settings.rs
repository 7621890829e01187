//! User settings for the bank ledger
//!
//! Presentation preferences read from `settings.json` in the data directory.
//! Every field has a default, so a partial or missing file is fine.

use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::storage::file_io::write_json_atomic;

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol shown in front of amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Whether to animate a progress bar for create/deposit/withdraw
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Delay between progress bar steps, in milliseconds
    #[serde(default = "default_progress_step_ms")]
    pub progress_step_ms: u64,

    /// Whether to colour terminal output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Number of audit entries shown by the history option
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "₹".to_string()
}

fn default_true() -> bool {
    true
}

fn default_progress_step_ms() -> u64 {
    100
}

fn default_history_limit() -> usize {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            show_progress: true,
            progress_step_ms: default_progress_step_ms(),
            color: true,
            history_limit: default_history_limit(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    ///
    /// Never writes; a missing file stays missing.
    pub fn load_or_default(paths: &LedgerPaths) -> Result<Self, LedgerError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| LedgerError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| LedgerError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), LedgerError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }
}
