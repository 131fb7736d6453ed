//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `balance`: Multi-currency balance map
//! - `compliance`: Compliance decisions, statuses and rule identifiers
//! - `currency`: Currency codes and ordered pairs
//! - `rates`: Dated rate tables
//! - `transaction`: Requests, transaction records and audit events
//! - `error`: Error types for the ledger

pub mod balance;
pub mod compliance;
pub mod currency;
pub mod error;
pub mod rates;
pub mod transaction;

pub use balance::Balances;
pub use compliance::{ComplianceDecision, ComplianceStatus, RuleId};
pub use currency::Pair;
pub use error::LedgerError;
pub use rates::{DayRates, RateTable};
pub use transaction::{
    AuditEvent, AuditEventKind, CarbonBadge, CarbonImpact, ConversionRequest, RecordId,
    TransactionRecord,
};
