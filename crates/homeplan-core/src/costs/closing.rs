//! Closing cost estimate: eight fee lines, each overridable.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money, Percent};

const DAYS_PER_YEAR: Decimal = dec!(365);

/// Fee assumptions. Any field omitted from JSON falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosingCostAssumptions {
    pub origination_pct: Percent,
    pub appraisal: Money,
    pub inspection: Money,
    pub title_insurance_pct: Percent,
    pub escrow_months: u32,
    pub recording_fees: Money,
    pub attorney_fees: Money,
    pub prepaid_days: u32,
}

impl Default for ClosingCostAssumptions {
    fn default() -> Self {
        ClosingCostAssumptions {
            origination_pct: dec!(1),
            appraisal: dec!(500),
            inspection: dec!(400),
            title_insurance_pct: dec!(0.5),
            escrow_months: 2,
            recording_fees: dec!(125),
            attorney_fees: dec!(500),
            prepaid_days: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosingCostInput {
    pub home_price: Money,
    pub loan_amount: Money,
    pub annual_rate_pct: Percent,
    pub annual_tax: Money,
    pub annual_insurance: Money,
    #[serde(default)]
    pub assumptions: ClosingCostAssumptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosingCostBreakdown {
    pub origination: Money,
    pub appraisal: Money,
    pub inspection: Money,
    pub title_insurance: Money,
    pub escrow_deposit: Money,
    pub recording_fees: Money,
    pub attorney_fees: Money,
    pub prepaid_interest: Money,
    pub total: Money,
}

pub fn estimate_closing_costs(input: &ClosingCostInput) -> ClosingCostBreakdown {
    let a = &input.assumptions;

    let origination = input.loan_amount * a.origination_pct / Decimal::ONE_HUNDRED;
    let title_insurance = input.home_price * a.title_insurance_pct / Decimal::ONE_HUNDRED;
    let escrow_deposit =
        (input.annual_tax + input.annual_insurance) / dec!(12) * Decimal::from(a.escrow_months);
    let prepaid_interest = input.loan_amount * input.annual_rate_pct / Decimal::ONE_HUNDRED
        / DAYS_PER_YEAR
        * Decimal::from(a.prepaid_days);

    let total = origination
        + a.appraisal
        + a.inspection
        + title_insurance
        + escrow_deposit
        + a.recording_fees
        + a.attorney_fees
        + prepaid_interest;

    ClosingCostBreakdown {
        origination,
        appraisal: a.appraisal,
        inspection: a.inspection,
        title_insurance,
        escrow_deposit,
        recording_fees: a.recording_fees,
        attorney_fees: a.attorney_fees,
        prepaid_interest,
        total,
    }
}

/// Closing costs wrapped with methodology and warnings.
pub fn analyze_closing_costs(input: &ClosingCostInput) -> ComputationOutput<ClosingCostBreakdown> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.loan_amount <= Decimal::ZERO {
        warnings.push("No loan amount; origination and prepaid interest are zero or negative".into());
    }

    let result = estimate_closing_costs(input);

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata("Closing Cost Estimate", input, warnings, elapsed, result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> ClosingCostInput {
        ClosingCostInput {
            home_price: dec!(400000),
            loan_amount: dec!(320000),
            annual_rate_pct: dec!(6),
            annual_tax: dec!(6000),
            annual_insurance: dec!(1800),
            assumptions: ClosingCostAssumptions::default(),
        }
    }

    #[test]
    fn test_default_lines() {
        let c = estimate_closing_costs(&base_input());
        assert_eq!(c.origination, dec!(3200));
        assert_eq!(c.appraisal, dec!(500));
        assert_eq!(c.inspection, dec!(400));
        assert_eq!(c.title_insurance, dec!(2000));
        assert_eq!(c.escrow_deposit, dec!(1300));
        assert_eq!(c.recording_fees, dec!(125));
        assert_eq!(c.attorney_fees, dec!(500));
        // 320,000 × 6% / 365 × 15
        assert_eq!(c.prepaid_interest.round_dp(2), dec!(789.04));
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let c = estimate_closing_costs(&base_input());
        let sum = c.origination
            + c.appraisal
            + c.inspection
            + c.title_insurance
            + c.escrow_deposit
            + c.recording_fees
            + c.attorney_fees
            + c.prepaid_interest;
        assert_eq!(c.total, sum);
        assert_eq!(c.total.round_dp(2), dec!(8814.04));
    }

    #[test]
    fn test_partial_override_from_json() {
        let input: ClosingCostInput = serde_json::from_value(serde_json::json!({
            "home_price": 400000,
            "loan_amount": 320000,
            "annual_rate_pct": 6,
            "annual_tax": 6000,
            "annual_insurance": 1800,
            "assumptions": { "appraisal": 650, "escrow_months": 3 }
        }))
        .unwrap();
        assert_eq!(input.assumptions.appraisal, dec!(650));
        assert_eq!(input.assumptions.inspection, dec!(400));

        let c = estimate_closing_costs(&input);
        assert_eq!(c.appraisal, dec!(650));
        assert_eq!(c.escrow_deposit, dec!(1950));
    }

    #[test]
    fn test_zero_prepaid_days() {
        let mut input = base_input();
        input.assumptions.prepaid_days = 0;
        let c = estimate_closing_costs(&input);
        assert_eq!(c.prepaid_interest, Decimal::ZERO);
    }
}
