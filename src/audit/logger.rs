//! Audit logger for append-only audit log
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::error::{LedgerError, LedgerResult};

use super::entry::AuditEntry;

/// Handles writing audit entries to the audit log file
///
/// The log file uses a line-delimited JSON format (JSONL) where each line
/// is a complete JSON object representing one audit entry.
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry as a JSON line and flush it
    pub fn log(&self, entry: &AuditEntry) -> LedgerResult<()> {
        let torn_tail = self.ends_mid_line()?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| LedgerError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        // Start a fresh line after a partial write so this entry stays readable
        if torn_tail {
            writeln!(file)
                .map_err(|e| LedgerError::Io(format!("Failed to write audit entry: {}", e)))?;
        }

        writeln!(file, "{}", json)
            .map_err(|e| LedgerError::Io(format!("Failed to write audit entry: {}", e)))?;

        file.flush()
            .map_err(|e| LedgerError::Io(format!("Failed to flush audit log: {}", e)))?;

        Ok(())
    }

    /// Read all audit entries from the log file
    ///
    /// Returns entries in chronological order (oldest first). Lines that do
    /// not parse, such as a final append cut short by a crash, are skipped
    /// with a warning.
    pub fn read_all(&self) -> LedgerResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                LedgerError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    path = %self.log_path.display(),
                    line = line_num + 1,
                    error = %e,
                    "skipping unreadable audit entry"
                ),
            }
        }

        Ok(entries)
    }

    /// Read the most recent N entries from the log
    pub fn read_recent(&self, count: usize) -> LedgerResult<Vec<AuditEntry>> {
        let all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries[start..].to_vec())
    }

    /// Read the most recent N entries for one account, oldest first
    pub fn read_for_account(&self, account_number: &str, count: usize) -> LedgerResult<Vec<AuditEntry>> {
        let mut matching: Vec<AuditEntry> = self
            .read_all()?
            .into_iter()
            .filter(|e| e.account_number.as_str() == account_number)
            .collect();
        let start = matching.len().saturating_sub(count);
        Ok(matching.split_off(start))
    }

    fn ends_mid_line(&self) -> LedgerResult<bool> {
        let mut file = match File::open(&self.log_path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(LedgerError::Io(format!("Failed to open audit log: {}", e))),
        };

        if file.metadata()?.len() == 0 {
            return Ok(false);
        }

        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1))?;
        file.read_exact(&mut last)?;
        Ok(last[0] != b'\n')
    }

    /// Get the number of entries in the audit log
    pub fn entry_count(&self) -> LedgerResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| LedgerError::Io(format!("Failed to open audit log: {}", e)))?;

        let reader = BufReader::new(file);
        let count = reader
            .lines()
            .filter_map(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count();

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use crate::models::{Account, AccountNumber, Money};
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path);
        (logger, temp_dir)
    }

    fn account(number: &str, balance: i64) -> Account {
        Account::new(
            AccountNumber::parse(number).unwrap(),
            format!("Holder {}", number),
            Money::from_units(balance),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();

        logger.log(&AuditEntry::create(&account("1001", 500))).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].account_number.as_str(), "1001");
    }

    #[test]
    fn test_multiple_entries() {
        let (logger, _temp) = create_test_logger();

        for i in 0..5 {
            logger
                .log(&AuditEntry::create(&account(&i.to_string(), i)))
                .unwrap();
        }

        assert_eq!(logger.entry_count().unwrap(), 5);
        assert_eq!(logger.read_all().unwrap().len(), 5);
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();

        for i in 0..10 {
            logger
                .log(&AuditEntry::create(&account(&format!("acc-{}", i), 1)))
                .unwrap();
        }

        let recent = logger.read_recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].account_number.as_str(), "acc-7");
        assert_eq!(recent[1].account_number.as_str(), "acc-8");
        assert_eq!(recent[2].account_number.as_str(), "acc-9");
    }

    #[test]
    fn test_read_for_account() {
        let (logger, _temp) = create_test_logger();

        logger.log(&AuditEntry::create(&account("1001", 500))).unwrap();
        logger.log(&AuditEntry::create(&account("2002", 5))).unwrap();
        logger
            .log(&AuditEntry::deposit(&account("1001", 700), Money::from_units(200)))
            .unwrap();
        logger
            .log(&AuditEntry::withdraw(&account("1001", 0), Money::from_units(700)))
            .unwrap();

        let history = logger.read_for_account("1001", 2).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].operation, Operation::Deposit);
        assert_eq!(history[1].operation, Operation::Withdraw);

        assert_eq!(logger.read_for_account("2002", 10).unwrap().len(), 1);
        assert!(logger.read_for_account("9999", 10).unwrap().is_empty());
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();

        assert_eq!(logger.entry_count().unwrap(), 0);
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_lines_skipped() {
        let (logger, temp) = create_test_logger();
        logger.log(&AuditEntry::create(&account("1001", 1))).unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(temp.path().join("audit.log"))
            .unwrap();
        write!(file, "not json\n{{\"timestamp\":\"2026").unwrap();
        drop(file);

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].account_number.as_str(), "1001");
        assert_eq!(logger.read_for_account("1001", 10).unwrap().len(), 1);

        logger
            .log(&AuditEntry::deposit(&account("1001", 3), Money::from_units(2)))
            .unwrap();
        assert_eq!(logger.read_for_account("1001", 10).unwrap().len(), 2);
    }

    #[test]
    fn test_survives_restart() {
        let (logger, temp) = create_test_logger();

        logger.log(&AuditEntry::create(&account("1001", 1))).unwrap();

        let logger2 = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(logger2.read_all().unwrap().len(), 1);
    }
}
