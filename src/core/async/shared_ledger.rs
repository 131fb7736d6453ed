//! Shared ledger access for concurrent async callers
//!
//! This module provides `SharedLedger`, which serializes `execute` calls from
//! many async tasks onto one `Ledger`.
//!
//! # Design
//!
//! A conversion reads balances and history, then writes balances, a record and
//! an audit event. Those steps must not interleave with another conversion,
//! so the whole `execute` runs under a single `tokio::sync::Mutex` guard:
//!
//! ```text
//! task A ─┐
//! task B ─┼─► SharedLedger ──lock──► Ledger::execute ──► stores
//! task C ─┘
//! ```
//!
//! Callers may therefore run with any concurrency; the funds check, velocity
//! count and both balance legs always see a consistent state.

use crate::core::ledger::Ledger;
use crate::types::{Balances, ConversionRequest, LedgerError, TransactionRecord};
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;

/// Result of executing a single request
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The request that was executed
    pub request: ConversionRequest,

    /// The recorded outcome, or why nothing was recorded
    pub result: Result<TransactionRecord, LedgerError>,
}

/// Mutual-exclusion wrapper around a borrowed `Ledger`
pub struct SharedLedger<'a> {
    ledger: Mutex<&'a mut Ledger>,
}

impl<'a> SharedLedger<'a> {
    /// Wrap a ledger for the duration of the borrow
    pub fn new(ledger: &'a mut Ledger) -> Self {
        SharedLedger {
            ledger: Mutex::new(ledger),
        }
    }

    /// Execute one conversion while holding the lock
    pub async fn execute(
        &self,
        request: &ConversionRequest,
    ) -> Result<TransactionRecord, LedgerError> {
        let mut ledger = self.ledger.lock().await;
        ledger.execute(request)
    }

    /// Execute many conversions with at most `max_concurrent` in flight
    ///
    /// Every request is attempted; failures are captured in the results.
    /// Results are in completion order, which equals input order only when
    /// `max_concurrent` is 1.
    pub async fn execute_all(
        &self,
        requests: Vec<ConversionRequest>,
        max_concurrent: usize,
    ) -> Vec<ProcessingResult> {
        stream::iter(requests)
            .map(|request| async move {
                let result = self.execute(&request).await;
                ProcessingResult { request, result }
            })
            .buffer_unordered(max_concurrent.max(1))
            .collect()
            .await
    }

    /// Current balances
    pub async fn balances(&self) -> Balances {
        self.ledger.lock().await.balances()
    }
}
