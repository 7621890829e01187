//! Core data models for the bank ledger
//!
//! Accounts, their identifying numbers, and the money type used for balances.

pub mod account;
pub mod ids;
pub mod money;

pub use account::{Account, AccountValidationError, Transcript};
pub use ids::AccountNumber;
pub use money::{Money, MoneyParseError};
