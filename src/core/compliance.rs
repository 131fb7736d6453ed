//! Compliance evaluation
//!
//! Every conversion runs through a strictly ordered chain:
//!
//! 1. **Sanctions**: the pair (or a wildcard `ANY_<dst>` / `<src>_ANY`) is
//!    listed. Blocked, and nothing else runs.
//! 2. **Amount thresholds**: above `blocked` is terminal; above `review`
//!    flags the conversion and continues.
//! 3. **Velocity**: enough matching transactions inside the trailing window
//!    raise clear to review, and review to blocked.
//!
//! The rule set arrives as an argument on every call. Evaluation is a pure
//! function of its inputs, so repeating it yields the same decision.

use crate::config::{ComplianceConfig, VelocityConfig, VelocityScope};
use crate::types::{ComplianceDecision, ComplianceStatus, Pair, RuleId, TransactionRecord};
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;

pub const SANCTIONS_REASON: &str = "sanctions pair blacklist";
pub const CLEAR_REASON: &str = "no compliance rules triggered";

/// Evaluate a conversion of `amount_src` over `pair` against prior `history`
///
/// `history` is ordered oldest first; only its most recent records are
/// inspected (see [`count_velocity`]).
pub fn decide(
    config: &ComplianceConfig,
    amount_src: Decimal,
    pair: &Pair,
    history: &[TransactionRecord],
    now: DateTime<Utc>,
) -> ComplianceDecision {
    if is_sanctioned(config, pair) {
        return ComplianceDecision::new(
            ComplianceStatus::Blocked,
            SANCTIONS_REASON.to_string(),
            vec![RuleId::SanctionsBlock],
        );
    }

    let mut outcome = Outcome::default();

    let thresholds = &config.amount_thresholds;
    if amount_src > thresholds.blocked {
        outcome.raise(
            ComplianceStatus::Blocked,
            RuleId::ThresholdBlocked,
            format!(
                "amount {} exceeds blocked threshold {}",
                amount_src, thresholds.blocked
            ),
        );
        return outcome.into_decision();
    }
    if amount_src > thresholds.review {
        outcome.raise(
            ComplianceStatus::Review,
            RuleId::ThresholdReview,
            format!(
                "amount {} exceeds review threshold {}",
                amount_src, thresholds.review
            ),
        );
    }

    let velocity = &config.velocity;
    if velocity.min_count > 0 {
        let count = count_velocity(velocity, pair, history, now);
        if count >= velocity.min_count {
            let escalated = match outcome.status {
                ComplianceStatus::Review => ComplianceStatus::Blocked,
                _ => ComplianceStatus::Review,
            };
            outcome.raise(
                escalated,
                RuleId::Velocity,
                format!(
                    "velocity: {} transactions in last {}s ({})",
                    count,
                    velocity.window_seconds,
                    scope_label(velocity.scope)
                ),
            );
        }
    }

    outcome.into_decision()
}

/// Whether the pair, `ANY_<dst>`, or `<src>_ANY` is on the sanctions list
pub fn is_sanctioned(config: &ComplianceConfig, pair: &Pair) -> bool {
    let blocked = &config.sanctions.blocked_pairs;
    pair.sanction_keys().iter().any(|key| blocked.contains(key))
}

/// Count prior transactions inside `[now - window_seconds, now]` matching the
/// configured scope
///
/// Walks history newest first and stops after `max_scan` records or at the
/// first record older than the window, whichever comes first. Records whose
/// timestamp lacks an explicit offset or does not parse, and records whose
/// pair cannot be read under a pair-sensitive scope, are excluded.
pub fn count_velocity(
    config: &VelocityConfig,
    pair: &Pair,
    history: &[TransactionRecord],
    now: DateTime<Utc>,
) -> usize {
    let cutoff = window_start(now, config.window_seconds);
    let mut count = 0;

    for record in history.iter().rev().take(config.max_scan) {
        let Some(at) = parse_timestamp(&record.timestamp) else {
            tracing::warn!(
                record = %record.id,
                timestamp = %record.timestamp,
                "Excluding record with unparseable timestamp from velocity count"
            );
            continue;
        };

        if at < cutoff {
            break;
        }
        if at > now {
            continue;
        }

        if matches_scope(config.scope, pair, record) {
            count += 1;
        }
    }

    count
}

fn window_start(now: DateTime<Utc>, window_seconds: u64) -> DateTime<Utc> {
    i64::try_from(window_seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// RFC 3339 timestamps only; a missing offset is ambiguous and rejected
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|at| at.with_timezone(&Utc))
}

fn matches_scope(scope: VelocityScope, pair: &Pair, record: &TransactionRecord) -> bool {
    if scope == VelocityScope::Any {
        return true;
    }

    let Some(prior) = record.parsed_pair() else {
        tracing::warn!(
            record = %record.id,
            pair = %record.pair,
            "Excluding record with unparseable pair from velocity count"
        );
        return false;
    };

    match scope {
        VelocityScope::Any => true,
        VelocityScope::BySrc => prior.src == pair.src,
        VelocityScope::ByPair => prior == *pair,
    }
}

fn scope_label(scope: VelocityScope) -> &'static str {
    match scope {
        VelocityScope::Any => "any",
        VelocityScope::BySrc => "by_src",
        VelocityScope::ByPair => "by_pair",
    }
}

/// Decision under construction
struct Outcome {
    status: ComplianceStatus,
    reasons: Vec<String>,
    rules: Vec<RuleId>,
}

impl Default for Outcome {
    fn default() -> Self {
        Outcome {
            status: ComplianceStatus::Clear,
            reasons: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl Outcome {
    fn raise(&mut self, status: ComplianceStatus, rule: RuleId, reason: String) {
        self.status = self.status.max(status);
        self.rules.push(rule);
        self.reasons.push(reason);
    }

    fn into_decision(self) -> ComplianceDecision {
        let reason = if self.reasons.is_empty() {
            CLEAR_REASON.to_string()
        } else {
            self.reasons.join("; ")
        };
        ComplianceDecision::new(self.status, reason, self.rules)
    }
}
