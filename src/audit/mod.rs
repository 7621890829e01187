//! Audit logging for the bank ledger
//!
//! Records every account opening, deposit and withdrawal with the balance
//! before and after, in an append-only JSON-lines file next to the ledger.
//!
//! # Example
//!
//! ```rust,ignore
//! use bank_ledger::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::deposit(&account, amount))?;
//! let history = logger.read_for_account("1001", 10)?;
//! ```

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
