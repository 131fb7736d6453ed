//! Conversion ledger
//!
//! This module provides the `Ledger` that orchestrates a conversion by
//! coordinating the rate resolver, carbon estimator and compliance rules with
//! the balance, history and audit stores.
//!
//! The ledger enforces:
//! - Request validation (supported currencies, positive amount, funds)
//! - No side effect at all when validation or rate resolution fails
//! - Blocked conversions are recorded but never move balances
//! - Both legs of a settled conversion land in one balance replace
//! - A failed record or audit append undoes the writes before it

use crate::config::LedgerConfig;
use crate::core::carbon::CarbonEstimator;
use crate::core::compliance;
use crate::core::rate_resolver::RateResolver;
use crate::core::stores::{AuditTrail, BalanceBook, SystemClock, TransactionHistory};
use crate::core::traits::{AuditLog, BalanceStore, Clock, HistoryStore};
use crate::types::currency::normalize_code;
use crate::types::{
    AuditEvent, AuditEventKind, Balances, ConversionRequest, LedgerError, Pair, RateTable,
    TransactionRecord,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Timestamp layout written to records and audit events
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Decimal places kept for the applied rate
const RATE_DP: u32 = 6;

/// Decimal places kept for currency amounts
const AMOUNT_DP: u32 = 2;

/// Conversion orchestrator
///
/// Owns the rate table and configuration, and reads and writes all state
/// through the store traits. By default every store is in-memory and time
/// comes from the system clock; the `with_*` builders swap them out.
pub struct Ledger {
    rates: RateTable,
    resolver: RateResolver,
    carbon: CarbonEstimator,
    config: LedgerConfig,
    balances: Box<dyn BalanceStore + Send>,
    history: Box<dyn HistoryStore + Send>,
    audit: Box<dyn AuditLog + Send>,
    clock: Box<dyn Clock + Send + Sync>,
}

impl Ledger {
    /// Create a ledger over `rates` with default balances and empty logs
    pub fn new(rates: RateTable, config: LedgerConfig) -> Self {
        Ledger {
            rates,
            resolver: RateResolver::new(&config.pivot),
            carbon: CarbonEstimator::new(config.carbon_factors.clone()),
            config,
            balances: Box::new(BalanceBook::new(Balances::default())),
            history: Box::new(TransactionHistory::new()),
            audit: Box::new(AuditTrail::new()),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_balance_store(mut self, store: impl BalanceStore + Send + 'static) -> Self {
        self.balances = Box::new(store);
        self
    }

    pub fn with_history_store(mut self, store: impl HistoryStore + Send + 'static) -> Self {
        self.history = Box::new(store);
        self
    }

    pub fn with_audit_log(mut self, log: impl AuditLog + Send + 'static) -> Self {
        self.audit = Box::new(log);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Run one conversion end to end
    ///
    /// Validates the request, resolves the rate from the latest bucket,
    /// estimates carbon impact and evaluates compliance against all prior
    /// history. Clear and review outcomes settle immediately; blocked
    /// outcomes are recorded without touching balances.
    ///
    /// # Arguments
    ///
    /// * `request` - Source and destination codes (any case) and source amount
    ///
    /// # Returns
    ///
    /// * `Ok(TransactionRecord)` for every evaluated conversion, blocked ones included
    /// * `Err(LedgerError)` if the request was rejected or a store failed
    ///
    /// # Errors
    ///
    /// Returns an error, with no balance change and nothing recorded, if:
    /// - Either currency is not supported
    /// - The amount is not positive after rounding to cents
    /// - The source balance does not cover the amount
    /// - The rate table is empty or the pair cannot be resolved
    ///
    /// A store failure while applying the outcome is returned after the
    /// earlier writes of the same conversion have been undone.
    pub fn execute(&mut self, request: &ConversionRequest) -> Result<TransactionRecord, LedgerError> {
        let pair = self.validate_pair(&request.src, &request.dst)?;

        let amount_src = request.amount.round_dp(AMOUNT_DP);
        if amount_src <= Decimal::ZERO {
            return Err(LedgerError::non_positive_amount(request.amount));
        }

        let before = self.balances.snapshot();
        let available = before.get(&pair.src);
        if available < amount_src {
            return Err(LedgerError::insufficient_funds(&pair.src, available, amount_src));
        }

        let (fx_date, day_rates) = self.rates.latest()?;
        let fx_date = fx_date.to_string();
        let rate = self.resolver.resolve(day_rates, &pair)?;

        let converted = amount_src
            .checked_mul(rate)
            .ok_or_else(|| LedgerError::arithmetic_overflow("conversion", &pair.dst))?;
        let carbon = self.carbon.impact(amount_src, &pair);

        let now = self.clock.now();
        let decision = compliance::decide(
            &self.config.compliance,
            amount_src,
            &pair,
            self.history.records(),
            now,
        );

        let blocked = decision.is_blocked();
        let (amount_dst, after) = if blocked {
            (Decimal::ZERO, before.clone())
        } else {
            let amount_dst = converted.round_dp(AMOUNT_DP);
            let after = before.after_conversion(&pair.src, amount_src, &pair.dst, amount_dst)?;
            (amount_dst, after)
        };

        let timestamp = format_timestamp(now);
        let record = TransactionRecord {
            id: Uuid::now_v7().to_string(),
            timestamp: timestamp.clone(),
            fx_date_used: fx_date,
            pair: pair.key(),
            rate: rate.round_dp(RATE_DP),
            amount_src,
            amount_dst,
            balances_before: before,
            balances_after: after.clone(),
            carbon,
            compliance: decision,
        };

        let event = AuditEvent {
            id: Uuid::now_v7().to_string(),
            timestamp,
            event: if blocked {
                AuditEventKind::Attempt
            } else {
                AuditEventKind::Settled
            },
            transaction_id: record.id.clone(),
            pair: record.pair.clone(),
            amount_src,
            status: record.compliance.status(),
            rules_triggered: record.compliance.rules_triggered().to_vec(),
        };

        if !blocked {
            self.balances.replace(after)?;
        }
        if let Err(e) = self.history.append(record.clone()) {
            self.undo_settlement(blocked, &record);
            return Err(e);
        }
        if let Err(e) = self.audit.append(event) {
            if let Err(undo) = self.history.retract_last() {
                tracing::error!(id = %record.id, error = %undo, "Failed to retract record");
            }
            self.undo_settlement(blocked, &record);
            return Err(e);
        }

        if blocked {
            tracing::warn!(
                id = %record.id,
                pair = %pair,
                amount = %amount_src,
                reason = %record.compliance.reason(),
                "Conversion blocked"
            );
        } else {
            tracing::info!(
                id = %record.id,
                pair = %pair,
                amount = %amount_src,
                rate = %record.rate,
                status = %record.compliance.status(),
                "Conversion settled"
            );
        }

        Ok(record)
    }

    /// Current balances
    pub fn balances(&self) -> Balances {
        self.balances.snapshot()
    }

    /// All transaction records, oldest first
    pub fn history(&self) -> &[TransactionRecord] {
        self.history.records()
    }

    /// All audit events, oldest first
    pub fn audit_events(&self) -> &[AuditEvent] {
        self.audit.events()
    }

    /// Date key of the rate bucket conversions currently use
    pub fn rate_date(&self) -> Result<&str, LedgerError> {
        self.rates.latest().map(|(date, _)| date)
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Put the pre-conversion balances back after a failed append
    fn undo_settlement(&mut self, blocked: bool, record: &TransactionRecord) {
        if blocked {
            return;
        }
        if let Err(e) = self.balances.replace(record.balances_before.clone()) {
            tracing::error!(id = %record.id, error = %e, "Failed to restore balances");
        }
    }

    fn validate_pair(&self, src: &str, dst: &str) -> Result<Pair, LedgerError> {
        for code in [src, dst] {
            let code = normalize_code(code);
            if !self.config.supported_currencies.contains(&code) {
                return Err(LedgerError::unsupported_currency(
                    &code,
                    &self.config.supported_currencies,
                ));
            }
        }
        Ok(Pair::new(src, dst))
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
