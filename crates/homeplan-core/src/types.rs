use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentage points (6.5 = 6.5%). Every user-facing rate in this crate is
/// expressed this way: interest rates, tax rates, ratios, LTV.
pub type Percent = Decimal;

/// Rates expressed as decimals (0.005 = 0.5%). Internal periodic rates only.
pub type Rate = Decimal;

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

/// Divide, returning zero when the denominator is not positive.
///
/// Every ratio in the engine (affordability percentages, DTI, LTV, effective
/// tax rate) degrades to zero rather than failing on an empty basis.
pub(crate) fn pct_of(numerator: Decimal, denominator: Decimal) -> Percent {
    if denominator <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        numerator / denominator * Decimal::ONE_HUNDRED
    }
}
