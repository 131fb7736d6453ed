//! Core business logic module
//!
//! This module contains the conversion components:
//! - `traits` - Store and clock abstractions for interchangeable implementations
//! - `stores` - In-memory stores and clocks
//! - `rate_resolver` - Rate derivation through a pivot currency
//! - `carbon` - Carbon impact estimation
//! - `compliance` - Sanctions, threshold and velocity rules
//! - `ledger` - Conversion orchestration
//! - `async` - Shared access for concurrent callers

pub mod r#async;
pub mod carbon;
pub mod compliance;
pub mod ledger;
pub mod rate_resolver;
pub mod stores;
pub mod traits;

pub use carbon::CarbonEstimator;
pub use ledger::Ledger;
pub use r#async::{ProcessingResult, SharedLedger};
pub use rate_resolver::RateResolver;
pub use stores::{AuditTrail, BalanceBook, FixedClock, SystemClock, TransactionHistory};
pub use traits::{AuditLog, BalanceStore, Clock, HistoryStore};
