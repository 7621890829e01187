//! Audit entry data structures
//!
//! Defines the operations that are audited and the entry format itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Account, AccountNumber, Money};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Account was opened
    Create,
    /// Money was paid in
    Deposit,
    /// Money was taken out
    Withdraw,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Deposit => write!(f, "DEPOSIT"),
            Operation::Withdraw => write!(f, "WITHDRAW"),
        }
    }
}

/// A single audit log entry
///
/// Records one successful balance-changing operation on an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    /// Type of operation performed
    pub operation: Operation,

    /// Account affected
    pub account_number: AccountNumber,

    /// Account holder's name at the time of the operation
    pub account_name: String,

    /// Amount opened with, deposited or withdrawn
    pub amount: Money,

    pub balance_before: Money,

    pub balance_after: Money,
}

impl AuditEntry {
    /// Entry for a newly opened account
    pub fn create(account: &Account) -> Self {
        let balance = account.check_balance();
        Self::new(Operation::Create, account, balance, Money::zero())
    }

    /// Entry for a deposit; `account` is the state after the deposit
    pub fn deposit(account: &Account, amount: Money) -> Self {
        let before = account.check_balance() - amount;
        Self::new(Operation::Deposit, account, amount, before)
    }

    /// Entry for a withdrawal; `account` is the state after the withdrawal
    pub fn withdraw(account: &Account, amount: Money) -> Self {
        let before = account.check_balance() + amount;
        Self::new(Operation::Withdraw, account, amount, before)
    }

    fn new(operation: Operation, account: &Account, amount: Money, balance_before: Money) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            account_number: account.account_number.clone(),
            account_name: account.name.clone(),
            amount,
            balance_before,
            balance_after: account.check_balance(),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self, currency_symbol: &str) -> String {
        format!(
            "[{}] {} {} ({}) {}: {} -> {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.account_number,
            self.account_name,
            self.amount.format_with_symbol(currency_symbol),
            self.balance_before.format_with_symbol(currency_symbol),
            self.balance_after.format_with_symbol(currency_symbol),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asha(balance: i64) -> Account {
        Account::new(
            AccountNumber::parse("1001").unwrap(),
            "Asha",
            Money::from_units(balance),
        )
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Deposit.to_string(), "DEPOSIT");
        assert_eq!(Operation::Withdraw.to_string(), "WITHDRAW");
    }

    #[test]
    fn test_create_entry() {
        let entry = AuditEntry::create(&asha(500));

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.account_number.as_str(), "1001");
        assert_eq!(entry.amount, Money::from_units(500));
        assert_eq!(entry.balance_before, Money::zero());
        assert_eq!(entry.balance_after, Money::from_units(500));
    }

    #[test]
    fn test_deposit_entry_reconstructs_before() {
        let entry = AuditEntry::deposit(&asha(700), Money::from_units(200));
        assert_eq!(entry.balance_before, Money::from_units(500));
        assert_eq!(entry.balance_after, Money::from_units(700));
    }

    #[test]
    fn test_withdraw_entry_reconstructs_before() {
        let entry = AuditEntry::withdraw(&asha(0), Money::from_units(700));
        assert_eq!(entry.balance_before, Money::from_units(700));
        assert_eq!(entry.balance_after, Money::zero());
    }

    #[test]
    fn test_serialization() {
        let entry = AuditEntry::create(&asha(5));

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"operation\":\"create\""));

        let deserialized: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, entry);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::deposit(&asha(700), Money::from_units(200));

        let formatted = entry.format_human_readable("₹");
        assert!(formatted.contains("DEPOSIT"));
        assert!(formatted.contains("1001 (Asha)"));
        assert!(formatted.contains("₹200.00: ₹500.00 -> ₹700.00"));
    }
}
