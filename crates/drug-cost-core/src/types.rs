use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DrugCostError;
use crate::DrugCostResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.6 = 60%). Never as percentages.
pub type Rate = Decimal;

/// How the usage period should be framed when deriving averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    /// A short treatment cycle (days to weeks). Only the daily average applies.
    #[default]
    Cycle,
    /// A full year of treatment. A monthly average is derived as well.
    Annual,
}

/// Drug usage over the simulated period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageParameters {
    /// Price of a single unit (box, vial, ...)
    pub unit_price: Money,
    /// Units consumed per day. Fractional doses are allowed.
    pub units_per_day: Decimal,
    /// Number of treatment days in the period. Signed so that a negative
    /// count decodes and is rejected by validation with the field name.
    pub days: i64,
}

impl UsageParameters {
    /// `unit_price * units_per_day * days`.
    ///
    /// Fails only when the product does not fit in a `Decimal`.
    pub fn total_cost(&self) -> DrugCostResult<Money> {
        self.unit_price
            .checked_mul(self.units_per_day)
            .and_then(|daily| daily.checked_mul(Decimal::from(self.days)))
            .ok_or_else(|| {
                DrugCostError::invalid(
                    "usage",
                    "unit_price * units_per_day * days exceeds the representable range",
                )
            })
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
