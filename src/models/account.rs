//! Account model
//!
//! A single bank account and the only operations allowed to change its
//! balance.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountNumber;
use super::money::Money;
use crate::error::{LedgerError, LedgerResult};

/// Longest display name accepted for an account
pub const MAX_NAME_LEN: usize = 100;

/// A bank account
///
/// Serializes to the on-disk record shape: `accountNumber`, `name`, `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique key within the ledger
    pub account_number: AccountNumber,

    /// Account holder's display name
    pub name: String,

    /// Current balance
    #[serde(rename = "amount")]
    balance: Money,
}

/// Read-only summary of one account's identity and balance
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcript {
    pub account_number: AccountNumber,
    pub name: String,
    pub balance: Money,
}

impl Account {
    /// Create a new account with an opening balance
    pub fn new(account_number: AccountNumber, name: impl Into<String>, balance: Money) -> Self {
        Self {
            account_number,
            name: name.into(),
            balance,
        }
    }

    /// Current balance
    pub fn check_balance(&self) -> Money {
        self.balance
    }

    /// Add `amount` to the balance and return the new balance
    ///
    /// Negative amounts are rejected; use [`Account::withdraw`] instead.
    pub fn deposit(&mut self, amount: Money) -> LedgerResult<Money> {
        if amount.is_negative() {
            return Err(LedgerError::invalid_amount(
                amount.to_string(),
                "deposit amount cannot be negative",
            ));
        }

        self.balance = self.balance.checked_add(amount).ok_or_else(|| {
            LedgerError::invalid_amount(amount.to_string(), "balance would overflow")
        })?;
        Ok(self.balance)
    }

    /// Subtract `amount` from the balance and return the new balance
    ///
    /// Fails without touching the balance when `amount` exceeds it.
    pub fn withdraw(&mut self, amount: Money) -> LedgerResult<Money> {
        if amount.is_negative() {
            return Err(LedgerError::invalid_amount(
                amount.to_string(),
                "withdrawal amount cannot be negative",
            ));
        }

        if amount > self.balance {
            return Err(LedgerError::InsufficientFunds {
                account: self.account_number.to_string(),
                requested: amount,
                available: self.balance,
            });
        }

        self.balance -= amount;
        Ok(self.balance)
    }

    /// Snapshot for display
    pub fn transcript(&self) -> Transcript {
        Transcript {
            account_number: self.account_number.clone(),
            name: self.name.clone(),
            balance: self.balance,
        }
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(AccountValidationError::NameTooLong(len));
        }

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_number)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}
