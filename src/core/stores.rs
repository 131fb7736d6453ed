//! In-memory store implementations and clocks
//!
//! These back the ledger in tests and batch replay. The JSON-file variants in
//! `io::file_store` wrap the same behavior with persistence.

use crate::core::traits::{AuditLog, BalanceStore, Clock, HistoryStore};
use crate::types::{AuditEvent, Balances, LedgerError, TransactionRecord};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory balance map
#[derive(Debug, Clone, Default)]
pub struct BalanceBook {
    balances: Balances,
}

impl BalanceBook {
    pub fn new(balances: Balances) -> Self {
        BalanceBook { balances }
    }
}

impl BalanceStore for BalanceBook {
    fn snapshot(&self) -> Balances {
        self.balances.clone()
    }

    fn replace(&mut self, balances: Balances) -> Result<(), LedgerError> {
        self.balances = balances;
        Ok(())
    }
}

/// In-memory transaction history
#[derive(Debug, Clone, Default)]
pub struct TransactionHistory {
    records: Vec<TransactionRecord>,
}

impl TransactionHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for TransactionHistory {
    fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    fn append(&mut self, record: TransactionRecord) -> Result<(), LedgerError> {
        self.records.push(record);
        Ok(())
    }

    fn retract_last(&mut self) -> Result<(), LedgerError> {
        self.records.pop();
        Ok(())
    }
}

/// In-memory audit log
#[derive(Debug, Clone, Default)]
pub struct AuditTrail {
    events: Vec<AuditEvent>,
}

impl AuditTrail {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for AuditTrail {
    fn events(&self) -> &[AuditEvent] {
        &self.events
    }

    fn append(&mut self, event: AuditEvent) -> Result<(), LedgerError> {
        self.events.push(event);
        Ok(())
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to an instant, movable by hand
///
/// Used for deterministic replays and tests of the velocity window.
#[derive(Debug)]
pub struct FixedClock {
    epoch_seconds: AtomicI64,
}

impl FixedClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        FixedClock {
            epoch_seconds: AtomicI64::new(at.timestamp()),
        }
    }

    /// Move the clock forward by `seconds`
    pub fn advance(&self, seconds: i64) {
        self.epoch_seconds.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.epoch_seconds.load(Ordering::SeqCst), 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
