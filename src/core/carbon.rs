//! Carbon impact estimation
//!
//! Linear model: `kg = amount_src / 1000 * factor`, with the factor looked up
//! per pair key and a fixed default for unlisted pairs.

use crate::config::{CarbonFactors, DEFAULT_CARBON_FACTOR};
use crate::types::{CarbonBadge, CarbonImpact, Pair};
use rust_decimal::Decimal;

/// Lower bound of the Medium tier (kg)
pub const MEDIUM_THRESHOLD_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Lower bound of the High tier (kg)
pub const HIGH_THRESHOLD_KG: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

const UNITS_PER_FACTOR: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

#[derive(Debug, Clone, Default)]
pub struct CarbonEstimator {
    factors: CarbonFactors,
}

impl CarbonEstimator {
    pub fn new(factors: CarbonFactors) -> Self {
        CarbonEstimator { factors }
    }

    /// kg CO₂ per 1000 source units for `pair`
    pub fn factor(&self, pair: &Pair) -> Decimal {
        self.factors
            .get(&pair.key())
            .copied()
            .unwrap_or(DEFAULT_CARBON_FACTOR)
    }

    /// Unrounded kg CO₂ for converting `amount_src` over `pair`
    ///
    /// Saturates at `Decimal::MAX` when a configured factor is large enough
    /// to overflow; an estimate never fails the conversion.
    pub fn estimate(&self, amount_src: Decimal, pair: &Pair) -> Decimal {
        let factor = self.factor(pair);
        amount_src
            .checked_div(UNITS_PER_FACTOR)
            .and_then(|units| units.checked_mul(factor))
            .unwrap_or_else(|| {
                tracing::warn!(
                    pair = %pair,
                    amount = %amount_src,
                    %factor,
                    "Carbon estimate overflowed, saturating"
                );
                Decimal::MAX
            })
    }

    /// Estimate and classify; kg is rounded to two decimals, the badge uses
    /// the unrounded value
    pub fn impact(&self, amount_src: Decimal, pair: &Pair) -> CarbonImpact {
        let kg = self.estimate(amount_src, pair);
        CarbonImpact {
            kg: kg.round_dp(2),
            badge: badge(kg),
        }
    }
}

/// Classify an impact: `< 0.5` Low, `< 2.0` Medium, otherwise High
pub fn badge(kg: Decimal) -> CarbonBadge {
    if kg < MEDIUM_THRESHOLD_KG {
        CarbonBadge::Low
    } else if kg < HIGH_THRESHOLD_KG {
        CarbonBadge::Medium
    } else {
        CarbonBadge::High
    }
}
