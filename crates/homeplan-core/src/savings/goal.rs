//! Savings goal: down payment + closing costs + cash reserves.
//!
//! Answers two independent questions. At the current savings rate, when is
//! the goal reached (`months_to_goal`, `target_date`)? To hit a fixed date,
//! what must be saved each month (`monthly_required`)? Both may be populated
//! and they are not reconciled with each other.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::calendar::{add_months, months_between};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};

pub const DEFAULT_DOWN_PAYMENT_PCT: Percent = dec!(20);
pub const DEFAULT_RESERVE_MONTHS: u32 = 3;

fn default_down_payment_pct() -> Percent {
    DEFAULT_DOWN_PAYMENT_PCT
}

fn default_reserve_months() -> u32 {
    DEFAULT_RESERVE_MONTHS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsGoalInput {
    pub home_price: Money,
    #[serde(default = "default_down_payment_pct")]
    pub target_down_payment_pct: Percent,
    pub closing_costs: Money,
    /// Months of housing cost to hold back as reserves after closing.
    #[serde(default = "default_reserve_months")]
    pub reserve_months: u32,
    pub monthly_housing_cost: Money,
    pub current_savings: Money,
    pub monthly_savings_rate: Money,
    /// Fixed purchase date the household is aiming for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoalResult {
    pub target_amount: Money,
    pub down_payment_target: Money,
    pub closing_costs_target: Money,
    pub reserves_target: Money,
    pub current_progress: Money,
    pub remaining_needed: Money,
    /// Months at the current rate; `None` when already met or not saving.
    pub months_to_goal: Option<u32>,
    /// `as_of + months_to_goal`.
    pub target_date: Option<NaiveDate>,
    /// Monthly savings needed to reach the goal by the caller's target date.
    pub monthly_required: Option<Money>,
    pub progress_percentage: Percent,
}

/// Project the savings goal as of `as_of` (the caller's "today").
pub fn calculate_savings_goal(input: &SavingsGoalInput, as_of: NaiveDate) -> SavingsGoalResult {
    let down_payment_target = input.home_price * input.target_down_payment_pct / Decimal::ONE_HUNDRED;
    let reserves_target = input.monthly_housing_cost * Decimal::from(input.reserve_months);
    let target_amount = down_payment_target + input.closing_costs + reserves_target;

    let remaining_needed = (target_amount - input.current_savings).max(Decimal::ZERO);
    let progress_percentage = if target_amount > Decimal::ZERO {
        (input.current_savings / target_amount * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
    } else {
        Decimal::ONE_HUNDRED
    };

    let months_to_goal = if remaining_needed > Decimal::ZERO
        && input.monthly_savings_rate > Decimal::ZERO
    {
        Some(
            (remaining_needed / input.monthly_savings_rate)
                .ceil()
                .to_u32()
                .unwrap_or(u32::MAX),
        )
    } else {
        None
    };

    let monthly_required = input
        .target_date
        .filter(|date| *date > as_of)
        .map(|date| {
            let months = months_between(as_of, date).max(1);
            remaining_needed / Decimal::from(months)
        });

    SavingsGoalResult {
        target_amount,
        down_payment_target,
        closing_costs_target: input.closing_costs,
        reserves_target,
        current_progress: input.current_savings,
        remaining_needed,
        months_to_goal,
        target_date: months_to_goal.map(|m| add_months(as_of, m)),
        monthly_required,
        progress_percentage,
    }
}

/// Savings goal wrapped with methodology and warnings.
pub fn project_savings_goal(
    input: &SavingsGoalInput,
    as_of: NaiveDate,
) -> ComputationOutput<SavingsGoalResult> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let result = calculate_savings_goal(input, as_of);

    if result.remaining_needed.is_zero() {
        warnings.push("Current savings already cover the goal".into());
    } else if input.monthly_savings_rate <= Decimal::ZERO {
        warnings.push("No monthly savings; the goal is never reached at the current rate".into());
    }
    if let Some(date) = input.target_date {
        if date <= as_of {
            warnings.push(format!("Target date {date} is not after {as_of}; ignored"));
        }
    }
    if let Some(required) = result.monthly_required {
        if input.monthly_savings_rate > Decimal::ZERO && required > input.monthly_savings_rate {
            warnings.push(format!(
                "Target date needs {} a month, above the current {}",
                required.round_dp(2),
                input.monthly_savings_rate
            ));
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Savings Goal Projection",
        &serde_json::json!({ "input": input, "as_of": as_of }),
        warnings,
        elapsed,
        result,
    )
}
