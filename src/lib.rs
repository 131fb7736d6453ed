//! FX Ledger Simulator Library
//! # Overview
//!
//! This library simulates single-party multi-currency conversions: it derives
//! a rate from sparse dated quotes, moves balances, estimates a carbon impact
//! and layers a clear/review/blocked compliance decision on every attempt.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Balances, Pair, TransactionRecord, etc.)
//! - [`config`] - Currency, compliance and carbon-factor configuration
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::rate_resolver`] - Rate derivation through a pivot currency
//!   - [`core::carbon`] - Carbon impact estimation and badges
//!   - [`core::compliance`] - Sanctions, amount thresholds and velocity
//!   - [`core::ledger`] - Conversion orchestration
//! - [`io`] - JSON stores, batch CSV readers and console output
//! - [`strategy`] - Sync and async batch replay
//!
//! # Compliance Outcomes
//!
//! - **clear**: no rule triggered, the conversion settles
//! - **review**: flagged but settled immediately
//! - **blocked**: recorded with zero destination amount, balances unchanged

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use config::{ComplianceConfig, LedgerConfig};
pub use core::{Ledger, SharedLedger};
pub use io::write_balances_csv;
pub use types::{
    AuditEvent, Balances, ComplianceDecision, ComplianceStatus, ConversionRequest, LedgerError,
    Pair, RateTable, TransactionRecord,
};
