//! Single purchase scenario: loan, payment, all-in monthly housing cost and
//! the share of each income basis it consumes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::income::IncomeScenarios;
use crate::amortization::schedule::monthly_payment;
use crate::types::{pct_of, with_metadata, ComputationOutput, Money, Percent};

/// Housing share of income at or below which a basis is considered
/// affordable. Separate from the DTI and stress-test thresholds.
pub const AFFORDABILITY_THRESHOLD_PCT: Percent = dec!(25);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AffordabilityStatus {
    Affordable,
    RequiresVariable,
    NotAffordable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub home_price: Money,
    pub down_payment: Money,
    pub annual_rate_pct: Percent,
    pub term_years: u32,
    pub annual_tax: Money,
    pub annual_insurance: Money,
    #[serde(default)]
    pub monthly_utilities: Money,
    pub incomes: IncomeScenarios,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub down_payment: Money,
    /// Home price less down payment. Not clamped: a down payment above the
    /// price yields a negative loan and a zero mortgage payment.
    pub loan_amount: Money,
    pub mortgage_payment: Money,
    pub total_monthly_housing: Money,
    pub full_percentage: Percent,
    pub conservative_percentage: Percent,
    pub family_percentage: Percent,
    pub affordability_status: AffordabilityStatus,
}

/// Tie-break order matters: the family-planning basis is checked first.
pub fn classify_affordability(
    family_percentage: Percent,
    conservative_percentage: Percent,
) -> AffordabilityStatus {
    if family_percentage <= AFFORDABILITY_THRESHOLD_PCT {
        AffordabilityStatus::Affordable
    } else if conservative_percentage <= AFFORDABILITY_THRESHOLD_PCT {
        AffordabilityStatus::RequiresVariable
    } else {
        AffordabilityStatus::NotAffordable
    }
}

pub fn calculate_scenario(input: &ScenarioInput) -> ScenarioResult {
    let loan_amount = input.home_price - input.down_payment;
    let mortgage_payment = monthly_payment(loan_amount, input.annual_rate_pct, input.term_years);
    let total_monthly_housing = mortgage_payment
        + input.annual_tax / dec!(12)
        + input.annual_insurance / dec!(12)
        + input.monthly_utilities;

    let full_percentage = pct_of(total_monthly_housing, input.incomes.full_income);
    let conservative_percentage = pct_of(total_monthly_housing, input.incomes.conservative_income);
    let family_percentage = pct_of(total_monthly_housing, input.incomes.family_planning_income);

    ScenarioResult {
        down_payment: input.down_payment,
        loan_amount,
        mortgage_payment,
        total_monthly_housing,
        full_percentage,
        conservative_percentage,
        family_percentage,
        affordability_status: classify_affordability(family_percentage, conservative_percentage),
    }
}

/// Scenario wrapped with methodology and warnings.
pub fn analyze_scenario(input: &ScenarioInput) -> ComputationOutput<ScenarioResult> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.down_payment > input.home_price {
        warnings.push(format!(
            "Down payment {} exceeds home price {}; no loan is needed",
            input.down_payment, input.home_price
        ));
    }
    if input.incomes.family_planning_income <= Decimal::ZERO {
        warnings.push("Family-planning income is zero; its housing share is reported as 0".into());
    }

    let result = calculate_scenario(input);

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Housing Cost vs Income Bases (25% threshold)",
        input,
        warnings,
        elapsed,
        result,
    )
}
