//! Compliance decision types
//!
//! A `ComplianceDecision` is produced once by the compliance engine and then
//! only read: its fields are private and exposed through accessors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a compliance evaluation, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplianceStatus {
    /// No rule triggered; settle normally
    Clear,
    /// Advisory flag; the conversion still settles
    Review,
    /// The conversion is recorded but never settles
    Blocked,
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComplianceStatus::Clear => "clear",
            ComplianceStatus::Review => "review",
            ComplianceStatus::Blocked => "blocked",
        };
        f.write_str(label)
    }
}

/// Identifier of a rule that contributed to a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    SanctionsBlock,
    ThresholdBlocked,
    ThresholdReview,
    Velocity,
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RuleId::SanctionsBlock => "sanctions_block",
            RuleId::ThresholdBlocked => "threshold_blocked",
            RuleId::ThresholdReview => "threshold_review",
            RuleId::Velocity => "velocity",
        };
        f.write_str(label)
    }
}

/// Result of the sanctions → thresholds → velocity chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DecisionRepr")]
pub struct ComplianceDecision {
    status: ComplianceStatus,
    reason: String,
    rules_triggered: Vec<RuleId>,
}

impl ComplianceDecision {
    pub(crate) fn new(status: ComplianceStatus, reason: String, rules_triggered: Vec<RuleId>) -> Self {
        ComplianceDecision {
            status,
            reason,
            rules_triggered,
        }
    }

    pub fn status(&self) -> ComplianceStatus {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Triggered rules in evaluation order
    pub fn rules_triggered(&self) -> &[RuleId] {
        &self.rules_triggered
    }

    pub fn is_blocked(&self) -> bool {
        self.status == ComplianceStatus::Blocked
    }
}

/// Persisted shapes a decision may be read from
///
/// Early history files stored only a capitalized status string
/// (`"Clear"`, `"Review"`).
#[derive(Deserialize)]
#[serde(untagged)]
enum DecisionRepr {
    Full {
        status: ComplianceStatus,
        #[serde(default)]
        reason: String,
        #[serde(default)]
        rules_triggered: Vec<RuleId>,
    },
    Legacy(String),
}

impl From<DecisionRepr> for ComplianceDecision {
    fn from(repr: DecisionRepr) -> Self {
        match repr {
            DecisionRepr::Full {
                status,
                reason,
                rules_triggered,
            } => ComplianceDecision::new(status, reason, rules_triggered),
            DecisionRepr::Legacy(label) => {
                let status = match label.to_lowercase().as_str() {
                    "blocked" => ComplianceStatus::Blocked,
                    "review" => ComplianceStatus::Review,
                    _ => ComplianceStatus::Clear,
                };
                ComplianceDecision::new(status, "legacy record".to_string(), Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_serialized_shape() {
        let decision = ComplianceDecision::new(
            ComplianceStatus::Blocked,
            "amount above review threshold; velocity".to_string(),
            vec![RuleId::ThresholdReview, RuleId::Velocity],
        );
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(value["status"], "blocked");
        assert_eq!(value["rules_triggered"][0], "threshold_review");
        assert_eq!(value["rules_triggered"][1], "velocity");

        let back: ComplianceDecision = serde_json::from_value(value).unwrap();
        assert_eq!(back, decision);
    }

    #[rstest]
    #[case::clear(r#""Clear""#, ComplianceStatus::Clear)]
    #[case::review(r#""Review""#, ComplianceStatus::Review)]
    #[case::blocked(r#""Blocked""#, ComplianceStatus::Blocked)]
    fn test_legacy_string_decision(#[case] json: &str, #[case] expected: ComplianceStatus) {
        let decision: ComplianceDecision = serde_json::from_str(json).unwrap();
        assert_eq!(decision.status(), expected);
        assert_eq!(decision.reason(), "legacy record");
        assert!(decision.rules_triggered().is_empty());
    }

    #[test]
    fn test_status_severity_order() {
        assert!(ComplianceStatus::Clear < ComplianceStatus::Review);
        assert!(ComplianceStatus::Review < ComplianceStatus::Blocked);
    }

    #[test]
    fn test_rule_display_matches_serde() {
        for rule in [
            RuleId::SanctionsBlock,
            RuleId::ThresholdBlocked,
            RuleId::ThresholdReview,
            RuleId::Velocity,
        ] {
            let serialized = serde_json::to_value(rule).unwrap();
            assert_eq!(serialized, rule.to_string());
        }
    }
}
