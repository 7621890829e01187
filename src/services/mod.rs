//! Service layer for the bank ledger
//!
//! The service layer provides business logic on top of the storage layer,
//! pairing each ledger change with its audit record.

pub mod account;

pub use account::AccountService;
