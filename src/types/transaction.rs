//! Transaction-related types for the FX ledger simulator
//!
//! This module defines the conversion request, the persisted transaction
//! record, the carbon impact attached to it, and the audit event emitted for
//! every attempt.

use super::balance::Balances;
use super::compliance::{ComplianceDecision, ComplianceStatus, RuleId};
use super::currency::Pair;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Record identifier (UUID v7, time-ordered)
pub type RecordId = String;

/// A single conversion request as submitted by the CLI or a batch file
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    /// Source currency code (normalized by the ledger)
    pub src: String,
    /// Destination currency code (normalized by the ledger)
    pub dst: String,
    /// Amount of source currency to convert
    pub amount: Decimal,
}

impl ConversionRequest {
    pub fn new(src: &str, dst: &str, amount: Decimal) -> Self {
        ConversionRequest {
            src: src.to_string(),
            dst: dst.to_string(),
            amount,
        }
    }
}

/// Three-tier impact classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarbonBadge {
    Low,
    Medium,
    High,
}

impl fmt::Display for CarbonBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CarbonBadge::Low => "Low",
            CarbonBadge::Medium => "Medium",
            CarbonBadge::High => "High",
        };
        f.write_str(label)
    }
}

/// Estimated impact attached to a transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonImpact {
    /// Kilograms of CO₂, rounded to two decimals
    pub kg: Decimal,
    pub badge: CarbonBadge,
}

/// Persisted outcome of one conversion attempt
///
/// Field names match the JSON history file. Records are append-only: the
/// ledger builds one, appends it, and never touches it again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Empty for records written before ids were introduced
    #[serde(default)]
    pub id: RecordId,

    /// UTC timestamp, RFC 3339 with second precision (`2025-08-01T09:30:00Z`)
    pub timestamp: String,

    /// Date key of the rate bucket used
    pub fx_date_used: String,

    /// Pair key (`SRC_DST`)
    pub pair: String,

    /// Rate applied, rounded to six decimals
    pub rate: Decimal,

    /// Amount debited from the source currency
    pub amount_src: Decimal,

    /// Amount credited to the destination currency (zero when blocked)
    pub amount_dst: Decimal,

    pub balances_before: Balances,

    /// Equal to `balances_before` when the conversion was blocked
    pub balances_after: Balances,

    pub carbon: CarbonImpact,

    pub compliance: ComplianceDecision,
}

impl TransactionRecord {
    /// Parsed pair, if the stored key is well-formed
    pub fn parsed_pair(&self) -> Option<Pair> {
        Pair::from_key(&self.pair)
    }
}

/// Kind of audit event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditEventKind {
    /// Recorded but not settled (blocked)
    Attempt,
    /// Balances moved (clear or review)
    Settled,
}

/// Audit trail entry, one per recorded conversion attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: RecordId,
    pub timestamp: String,
    pub event: AuditEventKind,
    /// Id of the transaction record this event describes
    pub transaction_id: RecordId,
    pub pair: String,
    pub amount_src: Decimal,
    pub status: ComplianceStatus,
    pub rules_triggered: Vec<RuleId>,
}
