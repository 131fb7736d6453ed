//! Asynchronous access to the ledger
//!
//! The ledger itself is synchronous. This module lets concurrent async tasks
//! share one instance:
//!
//! - **SharedLedger**: serializes `execute` calls behind a `tokio::sync::Mutex`
//! - **ProcessingResult**: per-request outcome of a concurrent run

pub mod shared_ledger;

pub use shared_ledger::{ProcessingResult, SharedLedger};
