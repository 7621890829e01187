//! bank-ledger - interactive terminal banking over a local JSON ledger
//!
//! Accounts are created, funded, drawn down and inspected through a prompt
//! loop. Every change is written straight back to `accounts.json` and
//! recorded in an append-only audit log.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Data directory resolution and user settings
//! - `error`: Custom error types
//! - `models`: Accounts, account numbers and money
//! - `storage`: Atomic JSON file I/O and the ledger store
//! - `audit`: Append-only audit log
//! - `services`: Account operations paired with their audit records
//! - `display`: Terminal colours and message formatting
//! - `shell`: The interactive session
//! - `logging`: Diagnostic tracing setup
//!
//! # Example
//!
//! ```rust,no_run
//! use bank_ledger::config::LedgerPaths;
//! use bank_ledger::models::{AccountNumber, Money};
//! use bank_ledger::storage::LedgerStore;
//!
//! # fn main() -> Result<(), bank_ledger::LedgerError> {
//! let paths = LedgerPaths::resolve(None)?;
//! let mut store = LedgerStore::new(paths.accounts_file());
//! store.load();
//!
//! let number = AccountNumber::parse("1001").expect("non-empty");
//! store.create_account(number, "Asha", Money::from_units(500))?;
//! store.deposit("1001", Money::from_units(200))?;
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod shell;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
