//! Ledger configuration
//!
//! Everything the engine needs besides data: supported currencies, the pivot
//! currency used for cross rates, compliance rules and carbon factors. All of
//! it is passed explicitly into the components that use it.
//!
//! Compliance configuration JSON (every section and field optional):
//!
//! ```json
//! {
//!   "amount_thresholds": { "review": 10000, "blocked": 50000 },
//!   "velocity": { "window_seconds": 60, "min_count": 3, "scope": "by_src", "max_scan": 200 },
//!   "sanctions": { "blocked_pairs": ["USD_RUB", "ANY_KPW"] }
//! }
//! ```

use crate::io::json_format::{load_json_if_present, load_json_or_default};
use crate::types::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

/// Pivot currency the rate tables are quoted against by default
pub const DEFAULT_PIVOT: &str = "AUD";

/// Default carbon factor (kg CO₂ per 1000 source units) for unlisted pairs
pub const DEFAULT_CARBON_FACTOR: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Default number of most recent history records scanned for velocity
pub const DEFAULT_VELOCITY_MAX_SCAN: usize = 200;

/// Amount limits on the source amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmountThresholds {
    /// Amounts strictly above this are flagged for review
    pub review: Decimal,
    /// Amounts strictly above this are blocked
    pub blocked: Decimal,
}

impl Default for AmountThresholds {
    fn default() -> Self {
        Self {
            review: Decimal::from(10_000),
            blocked: Decimal::from(50_000),
        }
    }
}

/// Which prior transactions count towards velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityScope {
    /// Every prior transaction
    Any,
    /// Same source currency
    BySrc,
    /// Same ordered pair
    ByPair,
}

/// Trailing-window velocity rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VelocityConfig {
    pub window_seconds: u64,
    /// Matching prior transactions needed to trigger
    pub min_count: usize,
    pub scope: VelocityScope,
    /// Upper bound on how many of the most recent records are inspected
    pub max_scan: usize,
}

impl Default for VelocityConfig {
    fn default() -> Self {
        Self {
            window_seconds: 60,
            min_count: 3,
            scope: VelocityScope::BySrc,
            max_scan: DEFAULT_VELOCITY_MAX_SCAN,
        }
    }
}

/// Sanctioned pairs; entries are pair keys or `ANY_<dst>` / `<src>_ANY`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SanctionsConfig {
    pub blocked_pairs: BTreeSet<String>,
}

/// Full compliance rule set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    pub amount_thresholds: AmountThresholds,
    pub velocity: VelocityConfig,
    pub sanctions: SanctionsConfig,
}

impl ComplianceConfig {
    /// Upper-case sanctions entries so lookups match normalized pairs
    pub fn normalized(mut self) -> Self {
        self.sanctions.blocked_pairs = self
            .sanctions
            .blocked_pairs
            .iter()
            .map(|key| key.trim().to_uppercase())
            .collect();
        self
    }
}

/// Carbon factor per pair key
pub type CarbonFactors = HashMap<String, Decimal>;

/// Complete configuration for a ledger instance
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Currencies a request may use
    pub supported_currencies: BTreeSet<String>,
    /// Currency every other currency is quoted against
    pub pivot: String,
    pub compliance: ComplianceConfig,
    pub carbon_factors: CarbonFactors,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            supported_currencies: ["USD", "EUR", "AUD"].iter().map(|c| c.to_string()).collect(),
            pivot: DEFAULT_PIVOT.to_string(),
            compliance: ComplianceConfig::default(),
            carbon_factors: CarbonFactors::new(),
        }
    }
}

impl LedgerConfig {
    /// Load compliance rules and carbon factors from JSON files
    ///
    /// Missing or empty files fall back to defaults. An undecodable carbon
    /// factor file also falls back, with a warning. Currency settings keep
    /// their defaults; override them with
    /// [`LedgerConfig::with_supported_currencies`] and [`LedgerConfig::with_pivot`].
    ///
    /// # Errors
    ///
    /// `ParseError` if the compliance file does not decode, so a typo never
    /// silently drops sanctions or thresholds.
    pub fn load(compliance_path: &Path, carbon_factors_path: &Path) -> Result<Self, LedgerError> {
        let compliance: ComplianceConfig = load_json_if_present(compliance_path)?;
        let carbon_factors: CarbonFactors = load_json_or_default(carbon_factors_path)?;

        Ok(Self {
            compliance: compliance.normalized(),
            carbon_factors: carbon_factors
                .into_iter()
                .map(|(key, factor)| (key.trim().to_uppercase(), factor))
                .collect(),
            ..Self::default()
        })
    }

    pub fn with_supported_currencies<I, S>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let currencies: BTreeSet<String> = currencies
            .into_iter()
            .map(|c| c.as_ref().trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        if currencies.is_empty() {
            tracing::warn!("Empty currency list, keeping defaults");
        } else {
            self.supported_currencies = currencies;
        }
        self
    }

    pub fn with_pivot(mut self, pivot: &str) -> Self {
        self.pivot = pivot.trim().to_uppercase();
        self
    }

    pub fn with_compliance(mut self, compliance: ComplianceConfig) -> Self {
        self.compliance = compliance.normalized();
        self
    }
}
