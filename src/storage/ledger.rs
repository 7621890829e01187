//! Ledger store for JSON storage
//!
//! Owns every account, loads them from accounts.json once at startup and
//! writes the whole collection back after each successful mutation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountNumber, Money};

use super::file_io::{preserve_copy, preserve_corrupt, read_json, write_json_atomic};

/// What `load` found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No ledger file yet; starting empty
    Fresh,
    /// The ledger file was read successfully
    Recovered { accounts: usize },
    /// The ledger file was read but some entries could not be loaded
    ///
    /// The original file is copied aside first so the next write does not
    /// lose the skipped entries.
    Partial {
        accounts: usize,
        skipped: usize,
        /// Where the untouched copy was written, if that succeeded
        preserved_at: Option<PathBuf>,
    },
    /// The ledger file could not be read or parsed; starting empty
    Corrupt {
        reason: String,
        /// Where the unreadable file was moved, if that succeeded
        preserved_at: Option<PathBuf>,
    },
}

/// One entry as it appears on disk
///
/// Lenient on purpose: older files may carry a numeric account number or a
/// `null` amount.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAccount {
    #[serde(default)]
    account_number: Option<StoredNumber>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    amount: Option<serde_json::Number>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredNumber {
    Text(String),
    Number(serde_json::Number),
}

impl StoredNumber {
    fn into_string(self) -> String {
        match self {
            StoredNumber::Text(s) => s,
            StoredNumber::Number(n) => n.to_string(),
        }
    }
}

/// The complete collection of accounts, keyed by account number
pub struct LedgerStore {
    path: PathBuf,
    accounts: BTreeMap<AccountNumber, Account>,
}

impl LedgerStore {
    /// Create an empty store backed by `path`; call [`LedgerStore::load`] next
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            accounts: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load accounts from disk, replacing anything in memory
    ///
    /// Never fails. An unreadable file is moved aside and the store starts
    /// empty; the returned outcome says which path was taken.
    pub fn load(&mut self) -> LoadOutcome {
        self.accounts.clear();

        let stored: BTreeMap<String, StoredAccount> = match read_json(&self.path) {
            Ok(Some(stored)) => stored,
            Ok(None) => {
                tracing::debug!(path = %self.path.display(), "no ledger file, starting fresh");
                return LoadOutcome::Fresh;
            }
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(path = %self.path.display(), error = %err, "ledger file unreadable");

                let preserved_at = match preserve_corrupt(&self.path) {
                    Ok(moved) => Some(moved),
                    Err(move_err) => {
                        tracing::warn!(error = %move_err, "could not preserve unreadable ledger");
                        None
                    }
                };
                return LoadOutcome::Corrupt {
                    reason,
                    preserved_at,
                };
            }
        };

        let mut skipped = 0;
        for (key, entry) in stored {
            let Some(number) = AccountNumber::parse(&key) else {
                tracing::warn!(name = %entry.name, "skipping ledger entry with a blank account number");
                skipped += 1;
                continue;
            };

            if self.accounts.contains_key(&number) {
                tracing::warn!(
                    key = %key,
                    account = %number,
                    "skipping ledger entry whose key duplicates another account once trimmed"
                );
                skipped += 1;
                continue;
            }

            if let Some(stored_number) = entry.account_number.map(StoredNumber::into_string) {
                if stored_number.trim() != number.as_str() {
                    tracing::warn!(
                        key = %number,
                        stored = %stored_number,
                        "account number in record differs from its key; using the key"
                    );
                }
            }

            let balance = match entry.amount {
                None => {
                    tracing::warn!(account = %number, "account has no usable amount; loading as zero");
                    Money::zero()
                }
                Some(amount) => match Money::from_json_number(&amount) {
                    Some(balance) => balance,
                    None => {
                        tracing::warn!(account = %number, amount = %amount, "skipping account with an out-of-range amount");
                        skipped += 1;
                        continue;
                    }
                },
            };

            self.accounts
                .insert(number.clone(), Account::new(number, entry.name, balance));
        }

        if skipped > 0 {
            let preserved_at = match preserve_copy(&self.path, "partial") {
                Ok(copy) => Some(copy),
                Err(copy_err) => {
                    tracing::warn!(error = %copy_err, "could not copy ledger with skipped entries");
                    None
                }
            };
            tracing::warn!(accounts = self.accounts.len(), skipped, "ledger loaded with skipped entries");
            return LoadOutcome::Partial {
                accounts: self.accounts.len(),
                skipped,
                preserved_at,
            };
        }

        tracing::info!(accounts = self.accounts.len(), "ledger loaded");
        LoadOutcome::Recovered {
            accounts: self.accounts.len(),
        }
    }

    /// Write every account to disk, replacing the previous file
    pub fn persist(&self) -> LedgerResult<()> {
        write_json_atomic(&self.path, &self.accounts)?;
        tracing::debug!(accounts = self.accounts.len(), "ledger persisted");
        Ok(())
    }

    /// Open a new account and persist the ledger
    pub fn create_account(
        &mut self,
        account_number: AccountNumber,
        name: &str,
        opening_balance: Money,
    ) -> LedgerResult<&Account> {
        if self.accounts.contains_key(&account_number) {
            return Err(LedgerError::duplicate_account(account_number.as_str()));
        }

        if opening_balance.is_negative() {
            return Err(LedgerError::invalid_amount(
                opening_balance.to_string(),
                "opening balance cannot be negative",
            ));
        }

        let account = Account::new(account_number.clone(), name.trim(), opening_balance);
        account
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.accounts.insert(account_number.clone(), account);
        self.persist()?;

        tracing::info!(account = %account_number, "account created");
        self.accounts
            .get(&account_number)
            .ok_or_else(|| LedgerError::account_not_found(account_number.as_str()))
    }

    /// Look up an account by number
    pub fn authenticate(&self, account_number: &str) -> Option<&Account> {
        self.accounts.get(account_number.trim())
    }

    /// Deposit into an account and persist; returns the new balance
    pub fn deposit(&mut self, account_number: &str, amount: Money) -> LedgerResult<Money> {
        let balance = self.account_mut(account_number)?.deposit(amount)?;
        self.persist()?;
        Ok(balance)
    }

    /// Withdraw from an account and persist; returns the new balance
    ///
    /// A rejected withdrawal changes nothing and writes nothing.
    pub fn withdraw(&mut self, account_number: &str, amount: Money) -> LedgerResult<Money> {
        let balance = self.account_mut(account_number)?.withdraw(amount)?;
        self.persist()?;
        Ok(balance)
    }

    /// All accounts in account-number order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn account_mut(&mut self, account_number: &str) -> LedgerResult<&mut Account> {
        let key = account_number.trim();
        self.accounts
            .get_mut(key)
            .ok_or_else(|| LedgerError::account_not_found(key))
    }
}
