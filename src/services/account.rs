//! Account service
//!
//! Business operations on top of the ledger store: every successful change
//! is persisted by the store and then recorded in the audit log.

use crate::audit::{AuditEntry, AuditLogger};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountNumber, Money};
use crate::storage::LedgerStore;

/// Service for account operations
pub struct AccountService<'a> {
    store: &'a mut LedgerStore,
    audit: &'a AuditLogger,
}

impl<'a> AccountService<'a> {
    pub fn new(store: &'a mut LedgerStore, audit: &'a AuditLogger) -> Self {
        Self { store, audit }
    }

    /// Open a new account
    pub fn create_account(
        &mut self,
        account_number: AccountNumber,
        name: &str,
        opening_balance: Money,
    ) -> LedgerResult<Account> {
        let account = self
            .store
            .create_account(account_number, name, opening_balance)
            .map_err(log_rejection("create"))?
            .clone();

        self.audit.log(&AuditEntry::create(&account))?;
        Ok(account)
    }

    /// Look up an account by number
    pub fn authenticate(&self, account_number: &str) -> Option<&Account> {
        let found = self.store.authenticate(account_number);
        if found.is_none() {
            tracing::info!(account = account_number, "authentication failed");
        }
        found
    }

    /// Deposit into an account; returns the new balance
    pub fn deposit(&mut self, account_number: &str, amount: Money) -> LedgerResult<Money> {
        let balance = self
            .store
            .deposit(account_number, amount)
            .map_err(log_rejection("deposit"))?;

        self.audit
            .log(&AuditEntry::deposit(self.expect_account(account_number)?, amount))?;
        Ok(balance)
    }

    /// Withdraw from an account; returns the new balance
    pub fn withdraw(&mut self, account_number: &str, amount: Money) -> LedgerResult<Money> {
        let balance = self
            .store
            .withdraw(account_number, amount)
            .map_err(log_rejection("withdraw"))?;

        self.audit
            .log(&AuditEntry::withdraw(self.expect_account(account_number)?, amount))?;
        Ok(balance)
    }

    /// Most recent audited operations for an account, oldest first
    pub fn history(&self, account_number: &str, limit: usize) -> LedgerResult<Vec<AuditEntry>> {
        self.audit.read_for_account(account_number.trim(), limit)
    }

    fn expect_account(&self, account_number: &str) -> LedgerResult<&Account> {
        self.store
            .authenticate(account_number)
            .ok_or_else(|| LedgerError::account_not_found(account_number.trim()))
    }
}

/// Log user-facing rejections at info and everything else at error
fn log_rejection(operation: &'static str) -> impl Fn(LedgerError) -> LedgerError {
    move |err| {
        if err.is_user_facing() {
            tracing::info!(operation, reason = %err, "operation rejected");
        } else {
            tracing::error!(operation, error = %err, "operation failed");
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        store: LedgerStore,
        audit: AuditLogger,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let mut store = LedgerStore::new(temp_dir.path().join("accounts.json"));
        store.load();
        let audit = AuditLogger::new(temp_dir.path().join("audit.log"));
        Fixture {
            _temp_dir: temp_dir,
            store,
            audit,
        }
    }

    fn number(s: &str) -> AccountNumber {
        AccountNumber::parse(s).unwrap()
    }

    #[test]
    fn test_operations_are_audited() {
        let mut fx = fixture();
        let mut service = AccountService::new(&mut fx.store, &fx.audit);

        service
            .create_account(number("1001"), "Asha", Money::from_units(500))
            .unwrap();
        service.deposit("1001", Money::from_units(200)).unwrap();
        service.withdraw("1001", Money::from_units(700)).unwrap();

        let history = service.history("1001", 10).unwrap();
        let operations: Vec<_> = history.iter().map(|e| e.operation).collect();
        assert_eq!(
            operations,
            vec![Operation::Create, Operation::Deposit, Operation::Withdraw]
        );
        assert_eq!(history[1].balance_before, Money::from_units(500));
        assert_eq!(history[2].balance_after, Money::zero());
    }

    #[test]
    fn test_rejections_are_not_audited() {
        let mut fx = fixture();
        let mut service = AccountService::new(&mut fx.store, &fx.audit);

        service
            .create_account(number("1001"), "Asha", Money::from_units(500))
            .unwrap();
        assert!(service
            .create_account(number("1001"), "Asha", Money::from_units(1))
            .is_err());
        assert!(service.withdraw("1001", Money::from_units(501)).is_err());
        assert!(service.deposit("9999", Money::from_units(1)).is_err());

        assert_eq!(fx.audit.entry_count().unwrap(), 1);
    }

    #[test]
    fn test_authenticate() {
        let mut fx = fixture();
        let mut service = AccountService::new(&mut fx.store, &fx.audit);
        service
            .create_account(number("1001"), "Asha", Money::from_units(500))
            .unwrap();

        assert_eq!(service.authenticate("1001").unwrap().name, "Asha");
        assert!(service.authenticate("9999").is_none());
    }

    #[test]
    fn test_history_limit() {
        let mut fx = fixture();
        let mut service = AccountService::new(&mut fx.store, &fx.audit);
        service
            .create_account(number("1001"), "Asha", Money::zero())
            .unwrap();
        for _ in 0..5 {
            service.deposit("1001", Money::from_units(1)).unwrap();
        }

        let history = service.history("1001", 3).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[2].balance_after, Money::from_units(5));
    }
}
