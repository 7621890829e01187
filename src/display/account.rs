//! Account display formatting
//!
//! Formats operation results, transcripts and history for terminal output.

use crate::audit::AuditEntry;
use crate::models::{Money, Transcript};

use super::style::Palette;

/// Shared formatting context: which currency symbol and which colours
#[derive(Debug, Clone)]
pub struct Formatter {
    pub palette: Palette,
    pub currency_symbol: String,
}

impl Formatter {
    pub fn new(palette: Palette, currency_symbol: impl Into<String>) -> Self {
        Self {
            palette,
            currency_symbol: currency_symbol.into(),
        }
    }

    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }

    /// "Account created for <name> with account number <number>."
    pub fn account_created(&self, transcript: &Transcript) -> String {
        self.palette.success(&format!(
            "Account created for {} with account number {}.",
            transcript.name, transcript.account_number
        ))
    }

    pub fn balance(&self, balance: Money) -> String {
        format!(
            "{} {}",
            self.palette.info("Current balance:"),
            self.palette.success(&self.money(balance))
        )
    }

    pub fn deposited(&self, amount: Money, balance: Money) -> String {
        format!(
            "{} deposited. New balance: {}",
            self.palette.info(&self.money(amount)),
            self.palette.success(&self.money(balance))
        )
    }

    pub fn withdrawn(&self, amount: Money, balance: Money) -> String {
        format!(
            "{} withdrawn. New balance: {}",
            self.palette.error(&self.money(amount)),
            self.palette.success(&self.money(balance))
        )
    }

    /// Aligned key/value block for one account
    pub fn transcript(&self, transcript: &Transcript) -> String {
        let mut output = String::new();
        output.push_str(&format!("  Account Number: {}\n", transcript.account_number));
        output.push_str(&format!("  Name:           {}\n", transcript.name));
        output.push_str(&format!(
            "  Balance:        {}\n",
            self.palette.success(&self.money(transcript.balance))
        ));
        output
    }

    /// One line per audited operation, oldest first
    pub fn history(&self, entries: &[AuditEntry]) -> String {
        if entries.is_empty() {
            return "No recorded activity for this account.\n".to_string();
        }

        entries
            .iter()
            .map(|e| format!("  {}\n", e.format_human_readable(&self.currency_symbol)))
            .collect()
    }

    pub fn error(&self, message: &str) -> String {
        self.palette.error(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountNumber};

    fn formatter() -> Formatter {
        Formatter::new(Palette::plain(), "₹")
    }

    fn asha(balance: i64) -> Account {
        Account::new(
            AccountNumber::parse("1001").unwrap(),
            "Asha",
            Money::from_units(balance),
        )
    }

    #[test]
    fn test_account_created() {
        assert_eq!(
            formatter().account_created(&asha(500).transcript()),
            "Account created for Asha with account number 1001."
        );
    }

    #[test]
    fn test_balance_messages() {
        let f = formatter();
        assert_eq!(f.balance(Money::from_units(700)), "Current balance: ₹700.00");
        assert_eq!(
            f.deposited(Money::from_units(200), Money::from_units(700)),
            "₹200.00 deposited. New balance: ₹700.00"
        );
        assert_eq!(
            f.withdrawn(Money::from_units(700), Money::zero()),
            "₹700.00 withdrawn. New balance: ₹0.00"
        );
    }

    #[test]
    fn test_transcript() {
        let output = formatter().transcript(&asha(700).transcript());
        assert_eq!(
            output,
            "  Account Number: 1001\n  Name:           Asha\n  Balance:        ₹700.00\n"
        );
    }

    #[test]
    fn test_history() {
        let f = formatter();
        assert_eq!(f.history(&[]), "No recorded activity for this account.\n");

        let entries = vec![AuditEntry::create(&asha(500))];
        let output = f.history(&entries);
        assert!(output.contains("CREATE 1001 (Asha)"));
        assert_eq!(output.lines().count(), 1);
    }
}
