//! Mortgage interest deduction estimate.
//!
//! Illustrative only: averages the interest paid over the first years of the
//! loan and prices it at the marginal rate. It is not a tax-law engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::schedule::{generate_schedule, yearly_summary, AmortizationSchedule, LoanTerms};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

/// Standard deduction, married filing jointly (2024).
pub const STANDARD_DEDUCTION: Money = dec!(29200);

/// Years of the loan averaged when the caller does not choose a window.
pub const DEFAULT_ANALYSIS_YEARS: u32 = 5;

fn default_analysis_years() -> u32 {
    DEFAULT_ANALYSIS_YEARS
}

fn default_standard_deduction() -> Money {
    STANDARD_DEDUCTION
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestDeductionInput {
    #[serde(flatten)]
    pub loan: LoanTerms,
    pub marginal_tax_rate_pct: Percent,
    #[serde(default = "default_analysis_years")]
    pub analysis_years: u32,
    #[serde(default = "default_standard_deduction")]
    pub standard_deduction: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestDeductionResult {
    /// Window actually averaged (requested window clipped to the schedule).
    pub analysis_years: u32,
    pub yearly_interest: Vec<Money>,
    pub average_annual_interest: Money,
    /// Average interest × marginal rate.
    pub annual_tax_savings: Money,
    pub standard_deduction: Money,
    /// Savings on the part of the interest above the standard deduction only.
    pub incremental_tax_savings: Money,
    pub worth_itemizing: bool,
}

pub fn estimate_interest_deduction(
    schedule: &AmortizationSchedule,
    marginal_tax_rate_pct: Percent,
    analysis_years: u32,
    standard_deduction: Money,
) -> InterestDeductionResult {
    let yearly_interest: Vec<Money> = yearly_summary(schedule)
        .into_iter()
        .take(analysis_years as usize)
        .map(|y| y.total_interest)
        .collect();

    let window = yearly_interest.len() as u32;
    let average_annual_interest = if window == 0 {
        Decimal::ZERO
    } else {
        yearly_interest.iter().copied().sum::<Decimal>() / Decimal::from(window)
    };

    let marginal = marginal_tax_rate_pct / Decimal::ONE_HUNDRED;
    let excess = (average_annual_interest - standard_deduction).max(Decimal::ZERO);

    InterestDeductionResult {
        analysis_years: window,
        yearly_interest,
        average_annual_interest,
        annual_tax_savings: average_annual_interest * marginal,
        standard_deduction,
        incremental_tax_savings: excess * marginal,
        worth_itemizing: average_annual_interest > standard_deduction,
    }
}

/// Build the schedule from loan terms and estimate the deduction.
pub fn analyze_interest_deduction(
    input: &InterestDeductionInput,
) -> ComputationOutput<InterestDeductionResult> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let schedule = generate_schedule(&input.loan, None);
    let result = estimate_interest_deduction(
        &schedule,
        input.marginal_tax_rate_pct,
        input.analysis_years,
        input.standard_deduction,
    );

    if result.analysis_years < input.analysis_years {
        warnings.push(format!(
            "Analysis window of {} years clipped to the {}-year schedule",
            input.analysis_years, result.analysis_years
        ));
    }
    if !result.worth_itemizing {
        warnings.push("Average interest does not exceed the standard deduction".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Mortgage Interest Deduction Estimate",
        input,
        warnings,
        elapsed,
        result,
    )
}
