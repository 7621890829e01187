//! Storage layer for the bank ledger
//!
//! Provides JSON file storage with atomic writes and the ledger store that
//! owns every account.

pub mod file_io;
pub mod ledger;

pub use file_io::{read_json, write_json_atomic};
pub use ledger::{LedgerStore, LoadOutcome};
