//! JSON-file backed stores
//!
//! Each store keeps its content in memory and rewrites the whole file after
//! every mutation (see [`save_json`]). The in-memory copy only changes once
//! the write succeeded, so a failed write leaves the store as it was.

use crate::core::traits::{AuditLog, BalanceStore, HistoryStore};
use crate::io::json_format::{load_json_if_present, load_json_or_default, save_json};
use crate::types::{AuditEvent, Balances, LedgerError, TransactionRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const RATES_FILE: &str = "fxrates.json";
pub const BALANCES_FILE: &str = "balances.json";
pub const CARBON_FACTORS_FILE: &str = "carbon_factors.json";
pub const COMPLIANCE_FILE: &str = "compliance.json";
pub const HISTORY_FILE: &str = "transactions_sample.json";
pub const AUDIT_FILE: &str = "audit_log.json";

/// Locations of every data file under one data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub rates: PathBuf,
    pub balances: PathBuf,
    pub carbon_factors: PathBuf,
    pub compliance: PathBuf,
    pub history: PathBuf,
    pub audit: PathBuf,
}

impl DataPaths {
    pub fn new(data_dir: &Path) -> Self {
        DataPaths {
            rates: data_dir.join(RATES_FILE),
            balances: data_dir.join(BALANCES_FILE),
            carbon_factors: data_dir.join(CARBON_FACTORS_FILE),
            compliance: data_dir.join(COMPLIANCE_FILE),
            history: data_dir.join(HISTORY_FILE),
            audit: data_dir.join(AUDIT_FILE),
        }
    }

    /// Use `path` for compliance rules instead of the data directory's file
    pub fn with_compliance(mut self, path: PathBuf) -> Self {
        self.compliance = path;
        self
    }
}

/// Balances persisted as a JSON object
#[derive(Debug)]
pub struct JsonBalanceFile {
    path: PathBuf,
    balances: Balances,
}

impl JsonBalanceFile {
    /// Open the balance file; missing, empty or undecodable content yields
    /// the default balances
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        let balances: Balances = load_json_or_default(path)?;
        Ok(JsonBalanceFile {
            path: path.to_path_buf(),
            balances,
        })
    }
}

impl BalanceStore for JsonBalanceFile {
    fn snapshot(&self) -> Balances {
        self.balances.clone()
    }

    fn replace(&mut self, balances: Balances) -> Result<(), LedgerError> {
        save_json(&self.path, &balances)?;
        self.balances = balances;
        Ok(())
    }
}

/// Append-only log persisted as a JSON array
#[derive(Debug)]
pub struct JsonLogFile<T> {
    path: PathBuf,
    entries: Vec<T>,
}

impl<T: Serialize + DeserializeOwned> JsonLogFile<T> {
    /// Open a log file
    ///
    /// A missing or empty file is an empty log.
    ///
    /// # Errors
    ///
    /// `ParseError` if the file holds content that does not decode; the log
    /// is never silently replaced.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        Ok(JsonLogFile {
            path: path.to_path_buf(),
            entries: load_json_if_present(path)?,
        })
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Append an entry and rewrite the file
    pub fn push(&mut self, entry: T) -> Result<(), LedgerError> {
        self.entries.push(entry);
        if let Err(e) = save_json(&self.path, &self.entries) {
            self.entries.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Drop the last entry and rewrite the file
    pub fn pop(&mut self) -> Result<Option<T>, LedgerError> {
        let Some(entry) = self.entries.pop() else {
            return Ok(None);
        };
        if let Err(e) = save_json(&self.path, &self.entries) {
            self.entries.push(entry);
            return Err(e);
        }
        Ok(Some(entry))
    }
}

impl HistoryStore for JsonLogFile<TransactionRecord> {
    fn records(&self) -> &[TransactionRecord] {
        self.entries()
    }

    fn append(&mut self, record: TransactionRecord) -> Result<(), LedgerError> {
        self.push(record)
    }

    fn retract_last(&mut self) -> Result<(), LedgerError> {
        self.pop().map(|_| ())
    }
}

impl AuditLog for JsonLogFile<AuditEvent> {
    fn events(&self) -> &[AuditEvent] {
        self.entries()
    }

    fn append(&mut self, event: AuditEvent) -> Result<(), LedgerError> {
        self.push(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuditEventKind, ComplianceStatus, RuleId};
    use rust_decimal::Decimal;
    use std::fs;

    fn event(id: &str) -> AuditEvent {
        AuditEvent {
            id: id.to_string(),
            timestamp: "2025-08-01T09:30:00Z".to_string(),
            event: AuditEventKind::Attempt,
            transaction_id: format!("tx-{}", id),
            pair: "USD_EUR".to_string(),
            amount_src: Decimal::from(60_000),
            status: ComplianceStatus::Blocked,
            rules_triggered: vec![RuleId::ThresholdBlocked],
        }
    }

    #[test]
    fn test_data_paths() {
        let paths = DataPaths::new(Path::new("fx_data"))
            .with_compliance(PathBuf::from("rules/strict.json"));
        assert_eq!(paths.rates, Path::new("fx_data/fxrates.json"));
        assert_eq!(paths.history, Path::new("fx_data/transactions_sample.json"));
        assert_eq!(paths.compliance, Path::new("rules/strict.json"));
    }

    #[test]
    fn test_balance_file_defaults_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BALANCES_FILE);

        let mut store = JsonBalanceFile::open(&path).unwrap();
        assert_eq!(store.snapshot(), Balances::default());
        assert!(!path.exists());

        let mut next = store.snapshot();
        next.set("USD", Decimal::from(800));
        store.replace(next.clone()).unwrap();

        let reopened = JsonBalanceFile::open(&path).unwrap();
        assert_eq!(reopened.snapshot(), next);
    }

    #[test]
    fn test_log_file_appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AUDIT_FILE);

        let mut log: JsonLogFile<AuditEvent> = JsonLogFile::open(&path).unwrap();
        AuditLog::append(&mut log, event("a1")).unwrap();
        AuditLog::append(&mut log, event("a2")).unwrap();

        let reopened: JsonLogFile<AuditEvent> = JsonLogFile::open(&path).unwrap();
        let ids: Vec<_> = reopened.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2"]);
    }

    #[test]
    fn test_log_file_pop_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AUDIT_FILE);

        let mut log: JsonLogFile<AuditEvent> = JsonLogFile::open(&path).unwrap();
        log.push(event("a1")).unwrap();
        log.push(event("a2")).unwrap();
        assert_eq!(log.pop().unwrap().map(|e| e.id), Some("a2".to_string()));

        let mut reopened: JsonLogFile<AuditEvent> = JsonLogFile::open(&path).unwrap();
        assert_eq!(reopened.entries().len(), 1);
        assert_eq!(reopened.entries()[0].id, "a1");
        reopened.pop().unwrap();
        assert_eq!(reopened.pop().unwrap(), None);
    }

    #[test]
    fn test_log_file_empty_content_is_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE);
        fs::write(&path, "\n").unwrap();

        let log: JsonLogFile<TransactionRecord> = JsonLogFile::open(&path).unwrap();
        assert!(log.records().is_empty());
    }

    #[test]
    fn test_log_file_rejects_undecodable_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(HISTORY_FILE);
        fs::write(&path, "{\"not\": \"a list\"}").unwrap();

        let result: Result<JsonLogFile<TransactionRecord>, _> = JsonLogFile::open(&path);
        assert!(matches!(result, Err(LedgerError::ParseError { .. })));
        // Left untouched
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"not\": \"a list\"}");
    }

    #[test]
    fn test_log_file_failed_write_keeps_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be makes the rename fail
        let path = dir.path().join(AUDIT_FILE);
        fs::create_dir(&path).unwrap();

        let mut log = JsonLogFile::<AuditEvent> {
            path: path.clone(),
            entries: Vec::new(),
        };
        assert!(log.push(event("a1")).is_err());
        assert!(log.entries().is_empty());
    }
}
