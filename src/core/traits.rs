//! Core traits for balance storage, history storage, the audit log and time
//!
//! The ledger reads and writes all state through these narrow interfaces, so
//! in-memory stores (tests, batch replay) and JSON-file stores (CLI) can be
//! swapped without touching the engine.

use crate::types::{AuditEvent, Balances, LedgerError, TransactionRecord};
use chrono::{DateTime, Utc};

/// Holder of the process-wide balance map
pub trait BalanceStore {
    /// Current balances
    fn snapshot(&self) -> Balances;

    /// Replace all balances in one step
    ///
    /// On error the previous balances must remain in effect.
    fn replace(&mut self, balances: Balances) -> Result<(), LedgerError>;
}

/// Append-only, ordered sequence of transaction records
pub trait HistoryStore {
    /// All records, oldest first
    fn records(&self) -> &[TransactionRecord];

    /// Append a record
    fn append(&mut self, record: TransactionRecord) -> Result<(), LedgerError>;

    /// Remove the most recent record
    ///
    /// Only used to undo an append whose conversion could not be completed.
    fn retract_last(&mut self) -> Result<(), LedgerError>;
}

/// Append-only, ordered sequence of audit events
pub trait AuditLog {
    /// All events, oldest first
    fn events(&self) -> &[AuditEvent];

    /// Append an event
    fn append(&mut self, event: AuditEvent) -> Result<(), LedgerError>;
}

/// Source of "now" for record timestamps and velocity windows
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}
