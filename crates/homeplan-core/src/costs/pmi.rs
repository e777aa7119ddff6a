//! Private mortgage insurance lifecycle.
//!
//! PMI applies above 80% LTV. With a schedule, the removal month is the first
//! month the balance reaches 80% of the original price (borrower-requested
//! cancellation) and the automatic termination month is the first month at
//! 78%. The premium is held constant until removal.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::schedule::{generate_schedule, AmortizationSchedule, LoanTerms};
use crate::types::{pct_of, with_metadata, ComputationOutput, Money, Percent};

/// Annual premium as a percentage of the loan when none is given.
pub const DEFAULT_PMI_RATE_PCT: Percent = dec!(0.5);

const PMI_REQUIRED_ABOVE_LTV_PCT: Percent = dec!(80);
const REQUEST_REMOVAL_SHARE: Decimal = dec!(0.8);
const AUTO_TERMINATION_SHARE: Decimal = dec!(0.78);

fn default_pmi_rate() -> Percent {
    DEFAULT_PMI_RATE_PCT
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmiInput {
    pub loan_amount: Money,
    pub home_price: Money,
    #[serde(default = "default_pmi_rate")]
    pub annual_pmi_rate_pct: Percent,
    /// Mortgage rate and term. When both are present a schedule is built and
    /// the removal month is located on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_rate_pct: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_years: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PmiResult {
    pub required: bool,
    pub monthly_pmi: Money,
    pub annual_pmi: Money,
    pub ltv: Percent,
    /// First month with balance at or below 80% of the price.
    pub months_until_removal: Option<u32>,
    /// First month with balance at or below 78% of the price.
    pub automatic_termination_month: Option<u32>,
    /// `monthly_pmi × months_until_removal`; zero when either is unknown.
    pub total_pmi_cost: Money,
}

pub fn calculate_pmi(
    loan_amount: Money,
    home_price: Money,
    annual_pmi_rate_pct: Percent,
    schedule: Option<&AmortizationSchedule>,
) -> PmiResult {
    let ltv = pct_of(loan_amount, home_price);

    if ltv <= PMI_REQUIRED_ABOVE_LTV_PCT {
        return PmiResult {
            required: false,
            monthly_pmi: Decimal::ZERO,
            annual_pmi: Decimal::ZERO,
            ltv,
            months_until_removal: None,
            automatic_termination_month: None,
            total_pmi_cost: Decimal::ZERO,
        };
    }

    let annual_pmi = loan_amount * annual_pmi_rate_pct / Decimal::ONE_HUNDRED;
    let monthly_pmi = annual_pmi / dec!(12);

    let months_until_removal =
        schedule.and_then(|s| first_month_at_or_below(s, home_price * REQUEST_REMOVAL_SHARE));
    let automatic_termination_month =
        schedule.and_then(|s| first_month_at_or_below(s, home_price * AUTO_TERMINATION_SHARE));

    let total_pmi_cost = months_until_removal
        .map(|m| monthly_pmi * Decimal::from(m))
        .unwrap_or(Decimal::ZERO);

    PmiResult {
        required: true,
        monthly_pmi,
        annual_pmi,
        ltv,
        months_until_removal,
        automatic_termination_month,
        total_pmi_cost,
    }
}

fn first_month_at_or_below(schedule: &AmortizationSchedule, threshold: Money) -> Option<u32> {
    schedule
        .rows
        .iter()
        .find(|row| row.balance <= threshold)
        .map(|row| row.month)
}

/// PMI analysis wrapped with methodology and warnings.
pub fn analyze_pmi(input: &PmiInput) -> ComputationOutput<PmiResult> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let schedule = match (input.annual_rate_pct, input.term_years) {
        (Some(rate), Some(years)) => Some(generate_schedule(
            &LoanTerms {
                principal: input.loan_amount,
                annual_rate_pct: rate,
                term_years: years,
            },
            None,
        )),
        _ => None,
    };

    let result = calculate_pmi(
        input.loan_amount,
        input.home_price,
        input.annual_pmi_rate_pct,
        schedule.as_ref(),
    );

    if result.required && schedule.is_none() {
        warnings.push("No rate/term supplied; removal month not projected".into());
    }
    if input.home_price <= Decimal::ZERO {
        warnings.push("Home price is not positive; LTV reported as 0".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "PMI Lifecycle (80% request / 78% automatic)",
        input,
        warnings,
        elapsed,
        result,
    )
}
