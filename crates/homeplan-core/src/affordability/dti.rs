//! Debt-to-income qualification against conventional underwriting bands.
//!
//! Front-end ratio is housing only; back-end adds every other monthly debt.
//! Bands: front-end 28 / 31, back-end 36 / 43.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{pct_of, with_metadata, ComputationOutput, Money, Percent};

pub const FRONT_END_GOOD_PCT: Percent = dec!(28);
pub const FRONT_END_ACCEPTABLE_PCT: Percent = dec!(31);
pub const BACK_END_GOOD_PCT: Percent = dec!(36);
pub const BACK_END_ACCEPTABLE_PCT: Percent = dec!(43);

const MAX_HOUSING_SHARE: Decimal = dec!(0.28);
const MAX_TOTAL_DEBT_SHARE: Decimal = dec!(0.36);

/// Monthly non-housing debt payments. Every field defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebtObligations {
    pub car_payments: Money,
    pub student_loans: Money,
    pub credit_cards: Money,
    pub other_debt: Money,
    pub child_support: Money,
}

impl DebtObligations {
    pub fn total(&self) -> Money {
        self.car_payments + self.student_loans + self.credit_cards + self.other_debt + self.child_support
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioStatus {
    Good,
    Acceptable,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualificationStatus {
    Qualified,
    Marginal,
    NotQualified,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DtiInput {
    pub gross_monthly_income: Money,
    pub housing_costs: Money,
    #[serde(default)]
    pub debts: DebtObligations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DtiResult {
    pub front_end_ratio: Percent,
    pub back_end_ratio: Percent,
    pub front_end_status: RatioStatus,
    pub back_end_status: RatioStatus,
    /// Advisory ceiling: 28% of income.
    pub max_housing_payment_28: Money,
    /// Advisory ceiling: 36% of income.
    pub max_total_debt_36: Money,
    pub qualification_status: QualificationStatus,
    pub total_monthly_debt: Money,
}

pub fn front_end_status(ratio: Percent) -> RatioStatus {
    band(ratio, FRONT_END_GOOD_PCT, FRONT_END_ACCEPTABLE_PCT)
}

pub fn back_end_status(ratio: Percent) -> RatioStatus {
    band(ratio, BACK_END_GOOD_PCT, BACK_END_ACCEPTABLE_PCT)
}

fn band(ratio: Percent, good: Percent, acceptable: Percent) -> RatioStatus {
    if ratio <= good {
        RatioStatus::Good
    } else if ratio <= acceptable {
        RatioStatus::Acceptable
    } else {
        RatioStatus::High
    }
}

pub fn qualification(front_end: Percent, back_end: Percent) -> QualificationStatus {
    if front_end <= FRONT_END_GOOD_PCT && back_end <= BACK_END_GOOD_PCT {
        QualificationStatus::Qualified
    } else if front_end <= FRONT_END_ACCEPTABLE_PCT && back_end <= BACK_END_ACCEPTABLE_PCT {
        QualificationStatus::Marginal
    } else {
        QualificationStatus::NotQualified
    }
}

/// Front-end and back-end ratios with band statuses.
///
/// Without positive income nothing can qualify: ratios are zero, both bands
/// are `High` and the result is `NotQualified`.
pub fn calculate_dti(
    gross_monthly_income: Money,
    housing_costs: Money,
    debts: &DebtObligations,
) -> DtiResult {
    let total_monthly_debt = debts.total();

    if gross_monthly_income <= Decimal::ZERO {
        return DtiResult {
            front_end_ratio: Decimal::ZERO,
            back_end_ratio: Decimal::ZERO,
            front_end_status: RatioStatus::High,
            back_end_status: RatioStatus::High,
            max_housing_payment_28: Decimal::ZERO,
            max_total_debt_36: Decimal::ZERO,
            qualification_status: QualificationStatus::NotQualified,
            total_monthly_debt,
        };
    }

    let front_end_ratio = pct_of(housing_costs, gross_monthly_income);
    let back_end_ratio = pct_of(housing_costs + total_monthly_debt, gross_monthly_income);

    DtiResult {
        front_end_ratio,
        back_end_ratio,
        front_end_status: front_end_status(front_end_ratio),
        back_end_status: back_end_status(back_end_ratio),
        max_housing_payment_28: gross_monthly_income * MAX_HOUSING_SHARE,
        max_total_debt_36: gross_monthly_income * MAX_TOTAL_DEBT_SHARE,
        qualification_status: qualification(front_end_ratio, back_end_ratio),
        total_monthly_debt,
    }
}

/// DTI wrapped with methodology and warnings.
pub fn analyze_dti(input: &DtiInput) -> ComputationOutput<DtiResult> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.gross_monthly_income <= Decimal::ZERO {
        warnings.push("Gross monthly income is not positive; borrower cannot qualify".into());
    }

    let result = calculate_dti(input.gross_monthly_income, input.housing_costs, &input.debts);

    if result.total_monthly_debt > Decimal::ZERO
        && result.back_end_status == RatioStatus::High
        && result.front_end_status != RatioStatus::High
    {
        warnings.push(format!(
            "Non-housing debt of {} pushes the back-end ratio above {}%",
            result.total_monthly_debt, BACK_END_ACCEPTABLE_PCT
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Front-End / Back-End DTI (28/36, 31/43)",
        input,
        warnings,
        elapsed,
        result,
    )
}
