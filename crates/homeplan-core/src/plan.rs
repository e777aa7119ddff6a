//! Whole-plan evaluation over the calculator state.
//!
//! Runs the full data flow for one purchase: income bases, property tax,
//! schedule, scenario, DTI, stress test, PMI, closing costs, savings goal and
//! interest deduction. Also compares candidate purchase dates against the
//! household's savings trajectory.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::affordability::dti::{calculate_dti, DebtObligations, DtiResult, QualificationStatus};
use crate::affordability::income::{
    average_variable_income, income_scenarios, HouseholdIncome, IncomeScenarios,
};
use crate::affordability::scenario::{
    calculate_scenario, AffordabilityStatus, ScenarioInput, ScenarioResult,
};
use crate::affordability::stress_test::{
    default_rate_increments, stress_test_scenario, StressTestInput, StressTestResult,
};
use crate::amortization::deduction::{
    estimate_interest_deduction, InterestDeductionResult, DEFAULT_ANALYSIS_YEARS,
    STANDARD_DEDUCTION,
};
use crate::amortization::schedule::{generate_schedule, yearly_summary, LoanTerms, YearlySummary};
use crate::calendar::{months_between, parse_date};
use crate::costs::closing::{
    estimate_closing_costs, ClosingCostAssumptions, ClosingCostBreakdown, ClosingCostInput,
};
use crate::costs::pmi::{calculate_pmi, PmiResult, DEFAULT_PMI_RATE_PCT};
use crate::property_tax::texas::{texas_property_tax, TaxExemptions, TaxResult};
use crate::savings::goal::{
    calculate_savings_goal, SavingsGoalInput, SavingsGoalResult, DEFAULT_DOWN_PAYMENT_PCT,
    DEFAULT_RESERVE_MONTHS,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::HomeplanResult;

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

/// Property and financing parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyState {
    pub home_price: Money,
    pub down_payment: Money,
    pub annual_rate_pct: Percent,
    pub term_years: u32,
    pub tax_rate_pct: Percent,
    pub annual_insurance: Money,
    pub monthly_utilities: Money,
    pub pmi_rate_pct: Percent,
    pub exemptions: TaxExemptions,
}

impl Default for PropertyState {
    fn default() -> Self {
        PropertyState {
            home_price: Decimal::ZERO,
            down_payment: Decimal::ZERO,
            annual_rate_pct: Decimal::ZERO,
            term_years: 30,
            tax_rate_pct: Decimal::ZERO,
            annual_insurance: Decimal::ZERO,
            monthly_utilities: Decimal::ZERO,
            pmi_rate_pct: DEFAULT_PMI_RATE_PCT,
            exemptions: TaxExemptions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsState {
    pub current_savings: Money,
    pub monthly_savings_rate: Money,
    pub target_down_payment_pct: Percent,
    pub reserve_months: u32,
}

impl Default for SavingsState {
    fn default() -> Self {
        SavingsState {
            current_savings: Decimal::ZERO,
            monthly_savings_rate: Decimal::ZERO,
            target_down_payment_pct: DEFAULT_DOWN_PAYMENT_PCT,
            reserve_months: DEFAULT_RESERVE_MONTHS,
        }
    }
}

/// Everything the form layer collects. Missing numbers default to zero and
/// dates travel as `YYYY-MM-DD` strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorState {
    pub income: HouseholdIncome,
    /// Month-by-month secondary variable pay. When non-empty its average
    /// replaces `income.secondary_variable`.
    pub variable_income_history: Vec<Money>,
    pub property: PropertyState,
    pub debts: DebtObligations,
    pub savings: SavingsState,
    pub purchase_date: Option<String>,
    pub target_date: Option<String>,
    pub marginal_tax_rate_pct: Percent,
    pub rate_increments: Vec<Percent>,
    pub closing_costs: ClosingCostAssumptions,
}

impl Default for CalculatorState {
    fn default() -> Self {
        CalculatorState {
            income: HouseholdIncome::default(),
            variable_income_history: Vec::new(),
            property: PropertyState::default(),
            debts: DebtObligations::default(),
            savings: SavingsState::default(),
            purchase_date: None,
            target_date: None,
            marginal_tax_rate_pct: Decimal::ZERO,
            rate_increments: default_rate_increments(),
            closing_costs: ClosingCostAssumptions::default(),
        }
    }
}

/// A candidate purchase: when, and optionally at what price and rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseTiming {
    pub label: String,
    pub purchase_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_rate_pct: Option<Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingComparisonInput {
    pub state: CalculatorState,
    pub timings: Vec<PurchaseTiming>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOutput {
    pub income_scenarios: IncomeScenarios,
    pub property_tax: TaxResult,
    pub scenario: ScenarioResult,
    pub dti: DtiResult,
    pub stress_test: Vec<StressTestResult>,
    pub pmi: PmiResult,
    pub closing_costs: ClosingCostBreakdown,
    pub savings_goal: SavingsGoalResult,
    pub interest_deduction: InterestDeductionResult,
    pub yearly_summary: Vec<YearlySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingOutcome {
    pub label: String,
    pub purchase_date: NaiveDate,
    /// Whole calendar months from `as_of` to the purchase, floored at zero.
    pub months_until_purchase: u32,
    pub home_price: Money,
    pub annual_rate_pct: Percent,
    /// Current savings plus the monthly rate for every month until purchase.
    pub projected_savings: Money,
    pub savings_target: Money,
    pub shortfall: Money,
    pub goal_met: bool,
    /// Monthly savings needed to close the gap by the purchase date.
    pub monthly_required: Option<Money>,
    pub scenario: ScenarioResult,
    pub qualification_status: QualificationStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingComparisonOutput {
    pub outcomes: Vec<TimingOutcome>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate the whole plan as of `as_of`.
pub fn evaluate_plan(state: &CalculatorState, as_of: NaiveDate) -> HomeplanResult<PlanOutput> {
    let purchase_date = optional_date("purchase_date", state.purchase_date.as_deref())?;
    let target_date = optional_date("target_date", state.target_date.as_deref())?;

    Ok(build_plan(
        state,
        state.property.home_price,
        state.property.annual_rate_pct,
        purchase_date,
        target_date,
        as_of,
    ))
}

/// Evaluate the plan and wrap it with methodology and warnings.
pub fn run_plan(
    state: &CalculatorState,
    as_of: NaiveDate,
) -> HomeplanResult<ComputationOutput<PlanOutput>> {
    let start = Instant::now();
    let plan = evaluate_plan(state, as_of)?;
    let warnings = plan_warnings(&plan);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Home Purchase Plan (scenario, DTI, stress, PMI, closing, savings, deduction)",
        &serde_json::json!({ "state": state, "as_of": as_of }),
        warnings,
        elapsed,
        plan,
    ))
}

/// Compare candidate purchase dates (and optional price/rate overrides).
///
/// Each timing is evaluated independently; order follows the input.
pub fn compare_purchase_timings(
    state: &CalculatorState,
    timings: &[PurchaseTiming],
    as_of: NaiveDate,
) -> HomeplanResult<Vec<TimingOutcome>> {
    timings
        .iter()
        .map(|timing| -> HomeplanResult<TimingOutcome> {
            let purchase_date = parse_date("purchase_date", &timing.purchase_date)?;
            let home_price = timing.home_price.unwrap_or(state.property.home_price);
            let annual_rate_pct = timing
                .annual_rate_pct
                .unwrap_or(state.property.annual_rate_pct);

            let plan = build_plan(
                state,
                home_price,
                annual_rate_pct,
                Some(purchase_date),
                Some(purchase_date),
                as_of,
            );

            let months_until_purchase = months_between(as_of, purchase_date).max(0) as u32;
            let projected_savings = state.savings.current_savings
                + state.savings.monthly_savings_rate * Decimal::from(months_until_purchase);
            let savings_target = plan.savings_goal.target_amount;
            let shortfall = (savings_target - projected_savings).max(Decimal::ZERO);

            Ok(TimingOutcome {
                label: timing.label.clone(),
                purchase_date,
                months_until_purchase,
                home_price,
                annual_rate_pct,
                projected_savings,
                savings_target,
                shortfall,
                goal_met: shortfall.is_zero(),
                monthly_required: plan.savings_goal.monthly_required,
                qualification_status: plan.dti.qualification_status,
                scenario: plan.scenario,
            })
        })
        .collect()
}

/// Timing comparison wrapped with methodology and warnings.
pub fn run_timing_comparison(
    input: &TimingComparisonInput,
    as_of: NaiveDate,
) -> HomeplanResult<ComputationOutput<TimingComparisonOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let outcomes = compare_purchase_timings(&input.state, &input.timings, as_of)?;
    for outcome in &outcomes {
        if outcome.purchase_date <= as_of {
            warnings.push(format!(
                "{}: purchase date {} is not in the future",
                outcome.label, outcome.purchase_date
            ));
        }
    }
    if !outcomes.is_empty() && outcomes.iter().all(|o| !o.goal_met) {
        warnings.push("No candidate date meets the savings goal at the current rate".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Purchase Timing Comparison",
        &serde_json::json!({ "input": input, "as_of": as_of }),
        warnings,
        elapsed,
        TimingComparisonOutput { outcomes },
    ))
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

fn optional_date(field: &str, value: Option<&str>) -> HomeplanResult<Option<NaiveDate>> {
    match value {
        Some(s) if !s.trim().is_empty() => parse_date(field, s).map(Some),
        _ => Ok(None),
    }
}

fn effective_income(state: &CalculatorState) -> HouseholdIncome {
    let mut income = state.income.clone();
    if !state.variable_income_history.is_empty() {
        income.secondary_variable = average_variable_income(&state.variable_income_history);
    }
    income
}

fn build_plan(
    state: &CalculatorState,
    home_price: Money,
    annual_rate_pct: Percent,
    purchase_date: Option<NaiveDate>,
    target_date: Option<NaiveDate>,
    as_of: NaiveDate,
) -> PlanOutput {
    let property = &state.property;

    // ─── Income & tax ────────────────────────────────────────────────
    let incomes = income_scenarios(&effective_income(state));
    let property_tax = texas_property_tax(home_price, property.tax_rate_pct, &property.exemptions);

    // ─── Financing ───────────────────────────────────────────────────
    let loan_amount = home_price - property.down_payment;
    let schedule = generate_schedule(
        &LoanTerms {
            principal: loan_amount,
            annual_rate_pct,
            term_years: property.term_years,
        },
        purchase_date,
    );

    let scenario = calculate_scenario(&ScenarioInput {
        home_price,
        down_payment: property.down_payment,
        annual_rate_pct,
        term_years: property.term_years,
        annual_tax: property_tax.annual_tax,
        annual_insurance: property.annual_insurance,
        monthly_utilities: property.monthly_utilities,
        incomes: incomes.clone(),
    });

    // ─── Qualification ───────────────────────────────────────────────
    let dti = calculate_dti(incomes.full_income, scenario.total_monthly_housing, &state.debts);

    let stress_test = stress_test_scenario(&StressTestInput {
        principal: loan_amount,
        base_rate_pct: annual_rate_pct,
        term_years: property.term_years,
        annual_tax: property_tax.annual_tax,
        annual_insurance: property.annual_insurance,
        monthly_utilities: property.monthly_utilities,
        gross_monthly_income: incomes.full_income,
        debts: state.debts.clone(),
        rate_increments: state.rate_increments.clone(),
    });

    // ─── Costs ───────────────────────────────────────────────────────
    let pmi = calculate_pmi(loan_amount, home_price, property.pmi_rate_pct, Some(&schedule));

    let closing_costs = estimate_closing_costs(&ClosingCostInput {
        home_price,
        loan_amount,
        annual_rate_pct,
        annual_tax: property_tax.annual_tax,
        annual_insurance: property.annual_insurance,
        assumptions: state.closing_costs.clone(),
    });

    // ─── Savings & tax benefit ───────────────────────────────────────
    let savings_goal = calculate_savings_goal(
        &SavingsGoalInput {
            home_price,
            target_down_payment_pct: state.savings.target_down_payment_pct,
            closing_costs: closing_costs.total,
            reserve_months: state.savings.reserve_months,
            monthly_housing_cost: scenario.total_monthly_housing,
            current_savings: state.savings.current_savings,
            monthly_savings_rate: state.savings.monthly_savings_rate,
            target_date,
        },
        as_of,
    );

    let interest_deduction = estimate_interest_deduction(
        &schedule,
        state.marginal_tax_rate_pct,
        DEFAULT_ANALYSIS_YEARS,
        STANDARD_DEDUCTION,
    );

    tracing::debug!(
        home_price = %home_price,
        rate = %annual_rate_pct,
        housing = %scenario.total_monthly_housing,
        status = ?scenario.affordability_status,
        "evaluated plan"
    );

    PlanOutput {
        income_scenarios: incomes,
        property_tax,
        scenario,
        dti,
        stress_test,
        pmi,
        closing_costs,
        savings_goal,
        interest_deduction,
        yearly_summary: yearly_summary(&schedule),
        payoff_date: schedule.payoff_date,
    }
}

fn plan_warnings(plan: &PlanOutput) -> Vec<String> {
    let mut warnings = Vec::new();

    if plan.scenario.loan_amount < Decimal::ZERO {
        warnings.push("Down payment exceeds the home price".into());
    }
    match plan.scenario.affordability_status {
        AffordabilityStatus::Affordable => {}
        AffordabilityStatus::RequiresVariable => warnings.push(
            "Housing stays under 25% only when the secondary earner's variable pay is counted"
                .into(),
        ),
        AffordabilityStatus::NotAffordable => {
            warnings.push("Housing exceeds 25% of every reduced income basis".into())
        }
    }
    if plan.dti.qualification_status == QualificationStatus::NotQualified {
        warnings.push(format!(
            "DTI {}% / {}% is outside conventional limits",
            plan.dti.front_end_ratio.round_dp(2),
            plan.dti.back_end_ratio.round_dp(2)
        ));
    }
    if plan.pmi.required {
        warnings.push(format!(
            "LTV {}% requires PMI of {} a month",
            plan.pmi.ltv.round_dp(2),
            plan.pmi.monthly_pmi.round_dp(2)
        ));
    }
    if plan.savings_goal.remaining_needed > Decimal::ZERO
        && plan.savings_goal.months_to_goal.is_none()
    {
        warnings.push("Savings goal is not reachable without a positive monthly savings rate".into());
    }
    if plan.interest_deduction.average_annual_interest > Decimal::ZERO
        && !plan.interest_deduction.worth_itemizing
    {
        warnings.push("Standard deduction beats itemizing mortgage interest".into());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_state() -> CalculatorState {
        CalculatorState {
            income: HouseholdIncome {
                primary: dec!(9000),
                secondary_base: dec!(6000),
                secondary_variable: dec!(1000),
            },
            property: PropertyState {
                home_price: dec!(400000),
                down_payment: dec!(40000),
                annual_rate_pct: dec!(6.5),
                term_years: 30,
                tax_rate_pct: dec!(2.1),
                annual_insurance: dec!(2400),
                monthly_utilities: dec!(300),
                exemptions: TaxExemptions {
                    homestead: true,
                    ..Default::default()
                },
                ..Default::default()
            },
            savings: SavingsState {
                current_savings: dec!(60000),
                monthly_savings_rate: dec!(3000),
                ..Default::default()
            },
            purchase_date: Some("2027-06-01".into()),
            marginal_tax_rate_pct: dec!(22),
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_wires_tax_into_scenario() {
        let plan = evaluate_plan(&sample_state(), d(2026, 10, 1)).unwrap();
        // (400k - 100k homestead) × 2.1%
        assert_eq!(plan.property_tax.annual_tax, dec!(6300));
        assert_eq!(plan.scenario.loan_amount, dec!(360000));
        assert_eq!(
            plan.dti.front_end_ratio,
            plan.scenario.total_monthly_housing / dec!(16000) * dec!(100)
        );
    }

    #[test]
    fn test_plan_pmi_and_closing() {
        let plan = evaluate_plan(&sample_state(), d(2026, 10, 1)).unwrap();
        // 90% LTV
        assert!(plan.pmi.required);
        assert!(plan.pmi.months_until_removal.is_some());
        assert_eq!(plan.savings_goal.closing_costs_target, plan.closing_costs.total);
        assert_eq!(plan.stress_test.len(), 4);
        assert_eq!(plan.payoff_date, Some(d(2057, 6, 1)));
    }

    #[test]
    fn test_variable_history_replaces_variable_income() {
        let mut state = sample_state();
        state.variable_income_history = vec![dec!(0), dec!(4000)];
        let plan = evaluate_plan(&state, d(2026, 10, 1)).unwrap();
        assert_eq!(plan.income_scenarios.conservative_income, dec!(8000));
    }

    #[test]
    fn test_bad_date_is_error() {
        let mut state = sample_state();
        state.purchase_date = Some("June 2027".into());
        assert!(evaluate_plan(&state, d(2026, 10, 1)).is_err());
    }

    #[test]
    fn test_blank_date_is_absent() {
        let mut state = sample_state();
        state.purchase_date = Some("  ".into());
        let plan = evaluate_plan(&state, d(2026, 10, 1)).unwrap();
        assert!(plan.payoff_date.is_none());
    }

    #[test]
    fn test_timings_projection() {
        let timings = vec![
            PurchaseTiming {
                label: "soon".into(),
                purchase_date: "2027-01-15".into(),
                home_price: None,
                annual_rate_pct: None,
            },
            PurchaseTiming {
                label: "later".into(),
                purchase_date: "2028-10-01".into(),
                home_price: None,
                annual_rate_pct: Some(dec!(5.5)),
            },
        ];
        let outcomes = compare_purchase_timings(&sample_state(), &timings, d(2026, 10, 1)).unwrap();
        assert_eq!(outcomes.len(), 2);

        assert_eq!(outcomes[0].months_until_purchase, 3);
        assert_eq!(outcomes[0].projected_savings, dec!(69000));
        assert!(!outcomes[0].goal_met);

        assert_eq!(outcomes[1].months_until_purchase, 24);
        assert_eq!(outcomes[1].projected_savings, dec!(132000));
        assert_eq!(outcomes[1].annual_rate_pct, dec!(5.5));
        assert!(outcomes[1].goal_met);
        assert!(outcomes[1].scenario.mortgage_payment < outcomes[0].scenario.mortgage_payment);
    }

    #[test]
    fn test_past_timing_floors_months() {
        let timings = vec![PurchaseTiming {
            label: "past".into(),
            purchase_date: "2025-01-01".into(),
            home_price: None,
            annual_rate_pct: None,
        }];
        let outcomes = compare_purchase_timings(&sample_state(), &timings, d(2026, 10, 1)).unwrap();
        assert_eq!(outcomes[0].months_until_purchase, 0);
        assert_eq!(outcomes[0].projected_savings, dec!(60000));
        assert!(outcomes[0].monthly_required.is_none());
    }

    #[test]
    fn test_state_defaults_from_empty_json() {
        let state: CalculatorState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.property.term_years, 30);
        assert_eq!(state.savings.target_down_payment_pct, dec!(20));
        assert_eq!(state.rate_increments, default_rate_increments());
        assert!(evaluate_plan(&state, d(2026, 10, 1)).is_ok());
    }
}
