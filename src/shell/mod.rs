//! Interactive banking session
//!
//! Drives the prompt sequence: create an account or run a transaction,
//! then continue or quit. Generic over its input and output so the whole
//! flow can be exercised with in-memory buffers.

pub mod progress;

use std::io::{BufRead, Write};
use std::time::Duration;

use crate::audit::AuditLogger;
use crate::config::Settings;
use crate::display::{Formatter, Palette};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountNumber, Money};
use crate::services::AccountService;
use crate::storage::LedgerStore;

pub use progress::ProgressBar;

const ACTION_PROMPT: &str =
    "Do you want to create an account or do a transaction? (Enter 'create' or 'transaction'): ";
const OPERATION_PROMPT: &str =
    "Enter 1 (Deposit), 2 (Withdraw), 3 (Check Balance), 4 (Transcript), 5 (History): ";
const CONTINUE_PROMPT: &str = "Do you want to continue or quit? (Enter 'continue' or 'quit'): ";

/// How a single flow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Completed,
    InputClosed,
}

/// Which balance-changing operation a transaction runs
#[derive(Debug, Clone, Copy)]
enum Movement {
    Deposit,
    Withdraw,
}

/// One interactive session over a ledger
pub struct Session<'a, R, W> {
    store: &'a mut LedgerStore,
    audit: &'a AuditLogger,
    formatter: Formatter,
    progress: Option<ProgressBar>,
    history_limit: usize,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(
        store: &'a mut LedgerStore,
        audit: &'a AuditLogger,
        settings: &Settings,
        input: R,
        output: W,
    ) -> Self {
        let progress = settings
            .show_progress
            .then(|| ProgressBar::new(Duration::from_millis(settings.progress_step_ms)));

        Self {
            store,
            audit,
            formatter: Formatter::new(Palette::new(settings.color), settings.currency_symbol.clone()),
            progress,
            history_limit: settings.history_limit,
            input,
            output,
        }
    }

    /// Run until the user quits or input ends
    ///
    /// User mistakes are reported and the session carries on; storage
    /// failures end the session with an error.
    pub fn run(mut self) -> LedgerResult<()> {
        loop {
            let banner = self.palette().banner("--- Welcome to the Banking System ---");
            writeln!(self.output, "\n{}\n", banner)?;

            let Some(action) = self.ask(ACTION_PROMPT)? else {
                return Ok(());
            };

            let flow = match action.to_lowercase().as_str() {
                "create" => self.create_account()?,
                "transaction" => self.transaction()?,
                _ => {
                    self.say_error("Invalid action. Please enter 'create' or 'transaction'.")?;
                    continue;
                }
            };
            if flow == Flow::InputClosed {
                return Ok(());
            }

            let Some(answer) = self.ask(CONTINUE_PROMPT)? else {
                return Ok(());
            };
            if answer.to_lowercase() != "continue" {
                let goodbye = self
                    .palette()
                    .farewell("Thank you for using the banking system. Goodbye!");
                writeln!(self.output, "{}", goodbye)?;
                return Ok(());
            }
        }
    }

    fn create_account(&mut self) -> LedgerResult<Flow> {
        let Some(number) = self.ask("Enter Your Account Number: ")? else {
            return Ok(Flow::InputClosed);
        };
        let Some(name) = self.ask("Enter Your Name: ")? else {
            return Ok(Flow::InputClosed);
        };
        let Some(amount) = self.ask("Enter Initial Deposit Amount: ")? else {
            return Ok(Flow::InputClosed);
        };

        let Some(number) = AccountNumber::parse(&number) else {
            self.say_error("Account number cannot be empty.")?;
            return Ok(Flow::Completed);
        };
        let Some(amount) = self.parse_amount(&amount)? else {
            return Ok(Flow::Completed);
        };

        self.show_progress("Creating account...")?;
        let result = self.service().create_account(number, &name, amount);
        match result {
            Ok(account) => {
                let message = self.formatter.account_created(&account.transcript());
                writeln!(self.output, "{}", message)?;
            }
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Completed)
    }

    fn transaction(&mut self) -> LedgerResult<Flow> {
        let Some(number) = self.ask("Enter Your Account Number for Authentication: ")? else {
            return Ok(Flow::InputClosed);
        };

        let found = self.service().authenticate(&number).cloned();
        let Some(account) = found else {
            self.report(LedgerError::account_not_found(number.trim()))?;
            return Ok(Flow::Completed);
        };
        let number = account.account_number.as_str();

        let Some(choice) = self.ask(OPERATION_PROMPT)? else {
            return Ok(Flow::InputClosed);
        };

        match choice.as_str() {
            "1" => return self.move_money(number, Movement::Deposit),
            "2" => return self.move_money(number, Movement::Withdraw),
            "3" => {
                let message = self.formatter.balance(account.check_balance());
                writeln!(self.output, "{}", message)?;
            }
            "4" => {
                let transcript = self.formatter.transcript(&account.transcript());
                write!(self.output, "{}", transcript)?;
            }
            "5" => {
                let limit = self.history_limit;
                match self.service().history(number, limit) {
                    Ok(entries) => {
                        let history = self.formatter.history(&entries);
                        write!(self.output, "{}", history)?;
                    }
                    Err(err) => {
                        tracing::warn!(account = number, error = %err, "could not read account history");
                        self.say_error("Account history is unavailable.")?;
                    }
                }
            }
            _ => self.say_error("Invalid option selected.")?,
        }
        Ok(Flow::Completed)
    }

    fn move_money(&mut self, number: &str, movement: Movement) -> LedgerResult<Flow> {
        let (prompt, description) = match movement {
            Movement::Deposit => ("Enter Amount to Deposit: ", "Processing deposit..."),
            Movement::Withdraw => ("Enter Amount to Withdraw: ", "Processing withdrawal..."),
        };

        let Some(input) = self.ask(prompt)? else {
            return Ok(Flow::InputClosed);
        };
        let Some(amount) = self.parse_amount(&input)? else {
            return Ok(Flow::Completed);
        };

        self.show_progress(description)?;
        let result = match movement {
            Movement::Deposit => self.service().deposit(number, amount),
            Movement::Withdraw => self.service().withdraw(number, amount),
        };

        match result {
            Ok(balance) => {
                let message = match movement {
                    Movement::Deposit => self.formatter.deposited(amount, balance),
                    Movement::Withdraw => self.formatter.withdrawn(amount, balance),
                };
                writeln!(self.output, "{}", message)?;
            }
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Completed)
    }

    fn service(&mut self) -> AccountService<'_> {
        AccountService::new(self.store, self.audit)
    }

    fn palette(&self) -> Palette {
        self.formatter.palette
    }

    /// Prompt and read one trimmed line; `None` once input is exhausted
    fn ask(&mut self, question: &str) -> LedgerResult<Option<String>> {
        let prompt = self.palette().prompt(question);
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Parse an amount, reporting a bad one to the user
    fn parse_amount(&mut self, input: &str) -> LedgerResult<Option<Money>> {
        match Money::parse(input) {
            Ok(amount) => Ok(Some(amount)),
            Err(e) => {
                self.report(LedgerError::invalid_amount(input, e.to_string()))?;
                Ok(None)
            }
        }
    }

    fn show_progress(&mut self, description: &str) -> LedgerResult<()> {
        if let Some(bar) = self.progress {
            let palette = self.palette();
            bar.run(&mut self.output, description, &palette)?;
        }
        Ok(())
    }

    /// Show a user-facing rejection; anything else is passed back up
    fn report(&mut self, err: LedgerError) -> LedgerResult<()> {
        if !err.is_user_facing() {
            return Err(err);
        }
        self.say_error(&rejection_message(&err))
    }

    fn say_error(&mut self, message: &str) -> LedgerResult<()> {
        let line = self.formatter.error(message);
        writeln!(self.output, "{}", line)?;
        Ok(())
    }
}

fn rejection_message(err: &LedgerError) -> String {
    match err {
        LedgerError::Duplicate { .. } => "Account already exists.".to_string(),
        LedgerError::NotFound { .. } => "Authentication failed. Account not found.".to_string(),
        LedgerError::InsufficientFunds { .. } => "Insufficient balance".to_string(),
        LedgerError::InvalidAmount { reason, .. } => format!("Invalid amount: {}", reason),
        LedgerError::Validation(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    struct Fixture {
        temp_dir: TempDir,
        store: LedgerStore,
        audit: AuditLogger,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let mut store = LedgerStore::new(temp_dir.path().join("accounts.json"));
        store.load();
        let audit = AuditLogger::new(temp_dir.path().join("audit.log"));
        Fixture {
            temp_dir,
            store,
            audit,
        }
    }

    fn quiet_settings() -> Settings {
        Settings {
            show_progress: false,
            color: false,
            ..Settings::default()
        }
    }

    fn run(fx: &mut Fixture, script: &str) -> String {
        let mut output = Vec::new();
        Session::new(
            &mut fx.store,
            &fx.audit,
            &quiet_settings(),
            Cursor::new(script.as_bytes().to_vec()),
            &mut output,
        )
        .run()
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_create_then_quit() {
        let mut fx = fixture();
        let output = run(&mut fx, "create\n1001\nAsha\n500\nquit\n");

        assert!(output.contains("Account created for Asha with account number 1001."));
        assert!(output.contains("Thank you for using the banking system. Goodbye!"));
        assert_eq!(
            fx.store.authenticate("1001").unwrap().check_balance(),
            Money::from_units(500)
        );
        assert!(fx.temp_dir.path().join("accounts.json").exists());
    }

    #[test]
    fn test_full_banking_scenario() {
        let mut fx = fixture();
        let script = "create\n1001\nAsha\n500\ncontinue\n\
                      transaction\n1001\n1\n200\ncontinue\n\
                      transaction\n1001\n2\n1000\ncontinue\n\
                      transaction\n1001\n3\ncontinue\n\
                      transaction\n1001\n2\n700\ncontinue\n\
                      transaction\n1001\n4\nquit\n";
        let output = run(&mut fx, script);

        assert!(output.contains("₹200.00 deposited. New balance: ₹700.00"));
        assert!(output.contains("Insufficient balance"));
        assert!(output.contains("Current balance: ₹700.00"));
        assert!(output.contains("₹700.00 withdrawn. New balance: ₹0.00"));
        assert!(output.contains("  Balance:        ₹0.00"));
        assert_eq!(
            fx.store.authenticate("1001").unwrap().check_balance(),
            Money::zero()
        );
    }

    #[test]
    fn test_duplicate_account_rejected() {
        let mut fx = fixture();
        let output = run(
            &mut fx,
            "create\n1001\nAsha\n500\ncontinue\ncreate\n1001\nRavi\n5\nquit\n",
        );

        assert!(output.contains("Account already exists."));
        let account = fx.store.authenticate("1001").unwrap();
        assert_eq!(account.name, "Asha");
        assert_eq!(account.check_balance(), Money::from_units(500));
    }

    #[test]
    fn test_unknown_account() {
        let mut fx = fixture();
        let output = run(&mut fx, "transaction\n9999\nquit\n");

        assert!(output.contains("Authentication failed. Account not found."));
        assert!(!output.contains(OPERATION_PROMPT));
    }

    #[test]
    fn test_invalid_action_reprompts() {
        let mut fx = fixture();
        let output = run(&mut fx, "withdraw\nCREATE\n1\nAsha\n1\nquit\n");

        assert!(output.contains("Invalid action. Please enter 'create' or 'transaction'."));
        assert_eq!(output.matches("--- Welcome to the Banking System ---").count(), 2);
        assert!(fx.store.authenticate("1").is_some());
    }

    #[test]
    fn test_invalid_option_and_amount() {
        let mut fx = fixture();
        let output = run(
            &mut fx,
            "create\n1001\nAsha\n500\ncontinue\n\
             transaction\n1001\n9\ncontinue\n\
             transaction\n1001\n1\nlots\ncontinue\n\
             transaction\n1001\n2\n-5\nquit\n",
        );

        assert!(output.contains("Invalid option selected."));
        assert!(output.contains("Invalid amount: not a number: lots"));
        assert!(output.contains("Invalid amount: withdrawal amount cannot be negative"));
        assert_eq!(
            fx.store.authenticate("1001").unwrap().check_balance(),
            Money::from_units(500)
        );
    }

    #[test]
    fn test_menu_choice_must_match_exactly() {
        let mut fx = fixture();
        let output = run(
            &mut fx,
            "create\n1001\nAsha\n500\ncontinue\n\
             transaction\n1001\n01\ncontinue\n\
             transaction\n1001\n1abc\nquit\n",
        );

        assert_eq!(output.matches("Invalid option selected.").count(), 2);
        assert!(!output.contains("Enter Amount to Deposit"));
    }

    #[test]
    fn test_history_option() {
        let mut fx = fixture();
        let output = run(
            &mut fx,
            "create\n1001\nAsha\n500\ncontinue\n\
             transaction\n1001\n1\n200\ncontinue\n\
             transaction\n1001\n5\nquit\n",
        );

        assert!(output.contains("CREATE 1001 (Asha)"));
        assert!(output.contains("DEPOSIT 1001 (Asha) ₹200.00: ₹500.00 -> ₹700.00"));
    }

    #[test]
    fn test_history_tolerates_torn_audit_log() {
        let mut fx = fixture();
        run(&mut fx, "create\n1001\nAsha\n500\nquit\n");

        let mut log = std::fs::OpenOptions::new()
            .append(true)
            .open(fx.temp_dir.path().join("audit.log"))
            .unwrap();
        write!(log, "{{\"timestamp\":\"2026").unwrap();
        drop(log);

        let output = run(
            &mut fx,
            "transaction\n1001\n5\ncontinue\n\
             transaction\n1001\n3\nquit\n",
        );

        assert!(output.contains("CREATE 1001 (Asha)"));
        assert!(output.contains("Current balance: ₹500.00"));
        assert!(output.contains("Goodbye!"));
    }

    #[test]
    fn test_history_unavailable_keeps_session_going() {
        let mut fx = fixture();
        fx.store
            .create_account(AccountNumber::parse("1001").unwrap(), "Asha", Money::from_units(500))
            .unwrap();
        std::fs::create_dir(fx.temp_dir.path().join("audit.log")).unwrap();

        let output = run(
            &mut fx,
            "transaction\n1001\n5\ncontinue\n\
             transaction\n1001\n3\nquit\n",
        );

        assert!(output.contains("Account history is unavailable."));
        assert!(output.contains("Current balance: ₹500.00"));
    }

    #[test]
    fn test_end_of_input_stops_quietly() {
        let mut fx = fixture();
        let output = run(&mut fx, "create\n1001\n");

        assert!(!output.contains("Goodbye"));
        assert!(fx.store.is_empty());
    }

    #[test]
    fn test_progress_bar_shown_when_enabled() {
        let mut fx = fixture();
        let settings = Settings {
            color: false,
            progress_step_ms: 0,
            ..Settings::default()
        };
        let mut output = Vec::new();
        Session::new(
            &mut fx.store,
            &fx.audit,
            &settings,
            Cursor::new(b"create\n1001\nAsha\n500\nquit\n".to_vec()),
            &mut output,
        )
        .run()
        .unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Creating account..."));
        assert!(text.contains("Operation complete!"));
    }
}
