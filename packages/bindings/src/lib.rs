use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use homeplan_core::calendar::parse_date;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_input<T: DeserializeOwned>(input_json: &str) -> NapiResult<T> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

fn to_json(output: &impl Serialize) -> NapiResult<String> {
    serde_json::to_string(output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_payment(input_json: String) -> NapiResult<String> {
    let input: homeplan_core::amortization::schedule::LoanTerms = parse_input(&input_json)?;
    to_json(&homeplan_core::amortization::schedule::calculate_payment(&input))
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: homeplan_core::amortization::schedule::AmortizationInput =
        parse_input(&input_json)?;
    to_json(&homeplan_core::amortization::schedule::build_amortization(&input))
}

#[napi]
pub fn interest_deduction(input_json: String) -> NapiResult<String> {
    let input: homeplan_core::amortization::deduction::InterestDeductionInput =
        parse_input(&input_json)?;
    to_json(&homeplan_core::amortization::deduction::analyze_interest_deduction(&input))
}

// ---------------------------------------------------------------------------
// Property tax
// ---------------------------------------------------------------------------

#[napi]
pub fn property_tax(input_json: String) -> NapiResult<String> {
    let input: homeplan_core::property_tax::texas::PropertyTaxInput = parse_input(&input_json)?;
    to_json(&homeplan_core::property_tax::texas::calculate_property_tax(&input))
}

// ---------------------------------------------------------------------------
// Affordability
// ---------------------------------------------------------------------------

#[napi]
pub fn affordability_scenario(input_json: String) -> NapiResult<String> {
    let input: homeplan_core::affordability::scenario::ScenarioInput = parse_input(&input_json)?;
    to_json(&homeplan_core::affordability::scenario::analyze_scenario(&input))
}

#[napi]
pub fn debt_to_income(input_json: String) -> NapiResult<String> {
    let input: homeplan_core::affordability::dti::DtiInput = parse_input(&input_json)?;
    to_json(&homeplan_core::affordability::dti::analyze_dti(&input))
}

#[napi]
pub fn stress_test(input_json: String) -> NapiResult<String> {
    let input: homeplan_core::affordability::stress_test::StressTestInput =
        parse_input(&input_json)?;
    to_json(&homeplan_core::affordability::stress_test::run_stress_test(&input))
}

// ---------------------------------------------------------------------------
// Costs
// ---------------------------------------------------------------------------

#[napi]
pub fn pmi_lifecycle(input_json: String) -> NapiResult<String> {
    let input: homeplan_core::costs::pmi::PmiInput = parse_input(&input_json)?;
    to_json(&homeplan_core::costs::pmi::analyze_pmi(&input))
}

#[napi]
pub fn closing_costs(input_json: String) -> NapiResult<String> {
    let input: homeplan_core::costs::closing::ClosingCostInput = parse_input(&input_json)?;
    to_json(&homeplan_core::costs::closing::analyze_closing_costs(&input))
}

// ---------------------------------------------------------------------------
// Savings and plan (caller supplies today's date as YYYY-MM-DD)
// ---------------------------------------------------------------------------

#[napi]
pub fn savings_goal(input_json: String, as_of: String) -> NapiResult<String> {
    let input: homeplan_core::savings::goal::SavingsGoalInput = parse_input(&input_json)?;
    let as_of = parse_date("as_of", &as_of).map_err(to_napi_error)?;
    to_json(&homeplan_core::savings::goal::project_savings_goal(&input, as_of))
}

#[napi]
pub fn evaluate_plan(state_json: String, as_of: String) -> NapiResult<String> {
    let state: homeplan_core::plan::CalculatorState = parse_input(&state_json)?;
    let as_of = parse_date("as_of", &as_of).map_err(to_napi_error)?;
    let output = homeplan_core::plan::run_plan(&state, as_of).map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn compare_purchase_timings(input_json: String, as_of: String) -> NapiResult<String> {
    let input: homeplan_core::plan::TimingComparisonInput = parse_input(&input_json)?;
    let as_of = parse_date("as_of", &as_of).map_err(to_napi_error)?;
    let output =
        homeplan_core::plan::run_timing_comparison(&input, as_of).map_err(to_napi_error)?;
    to_json(&output)
}
