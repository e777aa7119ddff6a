use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homeplan_core::affordability::dti::{self, DebtObligations, DtiInput};
use homeplan_core::affordability::income::{income_scenarios, HouseholdIncome};
use homeplan_core::affordability::scenario::{self, ScenarioInput};
use homeplan_core::affordability::stress_test::{self, default_rate_increments, StressTestInput};

use crate::input;

/// Monthly debt payments
#[derive(Args)]
pub struct DebtArgs {
    #[arg(long)]
    pub car_payments: Option<Decimal>,
    #[arg(long)]
    pub student_loans: Option<Decimal>,
    #[arg(long)]
    pub credit_cards: Option<Decimal>,
    #[arg(long)]
    pub other_debt: Option<Decimal>,
    #[arg(long)]
    pub child_support: Option<Decimal>,
}

impl DebtArgs {
    fn obligations(&self) -> DebtObligations {
        DebtObligations {
            car_payments: self.car_payments.unwrap_or_default(),
            student_loans: self.student_loans.unwrap_or_default(),
            credit_cards: self.credit_cards.unwrap_or_default(),
            other_debt: self.other_debt.unwrap_or_default(),
            child_support: self.child_support.unwrap_or_default(),
        }
    }
}

/// Arguments for the affordability scenario
#[derive(Args)]
pub struct ScenarioArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub home_price: Option<Decimal>,

    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    #[arg(long, default_value_t = 30)]
    pub years: u32,

    #[arg(long)]
    pub annual_tax: Option<Decimal>,

    #[arg(long)]
    pub annual_insurance: Option<Decimal>,

    #[arg(long)]
    pub monthly_utilities: Option<Decimal>,

    /// Primary earner's gross monthly income
    #[arg(long)]
    pub primary: Option<Decimal>,

    /// Secondary earner's base monthly income
    #[arg(long)]
    pub secondary_base: Option<Decimal>,

    /// Secondary earner's average variable monthly income
    #[arg(long)]
    pub secondary_variable: Option<Decimal>,
}

/// Arguments for the DTI calculation
#[derive(Args)]
pub struct DtiArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Gross monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Total monthly housing cost
    #[arg(long)]
    pub housing: Option<Decimal>,

    #[command(flatten)]
    pub debts: DebtArgs,
}

/// Arguments for the rate stress test
#[derive(Args)]
pub struct StressTestArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Base annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    #[arg(long, default_value_t = 30)]
    pub years: u32,

    #[arg(long)]
    pub annual_tax: Option<Decimal>,

    #[arg(long)]
    pub annual_insurance: Option<Decimal>,

    #[arg(long)]
    pub monthly_utilities: Option<Decimal>,

    /// Gross monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Rate shocks in percentage points (comma-separated, e.g. "0,1,2,3")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub increments: Option<Vec<Decimal>>,

    #[command(flatten)]
    pub debts: DebtArgs,
}

pub fn run_scenario(args: ScenarioArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario_input: ScenarioInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let income = HouseholdIncome {
            primary: args
                .primary
                .ok_or("--primary is required (or provide --input)")?,
            secondary_base: args.secondary_base.unwrap_or_default(),
            secondary_variable: args.secondary_variable.unwrap_or_default(),
        };
        ScenarioInput {
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            down_payment: args.down_payment.unwrap_or_default(),
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.years,
            annual_tax: args.annual_tax.unwrap_or_default(),
            annual_insurance: args.annual_insurance.unwrap_or_default(),
            monthly_utilities: args.monthly_utilities.unwrap_or_default(),
            incomes: income_scenarios(&income),
        }
    };

    let result = scenario::analyze_scenario(&scenario_input);
    Ok(serde_json::to_value(result)?)
}

pub fn run_dti(args: DtiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dti_input: DtiInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        DtiInput {
            gross_monthly_income: args
                .income
                .ok_or("--income is required (or provide --input)")?,
            housing_costs: args
                .housing
                .ok_or("--housing is required (or provide --input)")?,
            debts: args.debts.obligations(),
        }
    };

    let result = dti::analyze_dti(&dti_input);
    Ok(serde_json::to_value(result)?)
}

pub fn run_stress_test(args: StressTestArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let stress_input: StressTestInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        StressTestInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            base_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.years,
            annual_tax: args.annual_tax.unwrap_or_default(),
            annual_insurance: args.annual_insurance.unwrap_or_default(),
            monthly_utilities: args.monthly_utilities.unwrap_or_default(),
            gross_monthly_income: args
                .income
                .ok_or("--income is required (or provide --input)")?,
            debts: args.debts.obligations(),
            rate_increments: args.increments.unwrap_or_else(default_rate_increments),
        }
    };

    let result = stress_test::run_stress_test(&stress_input);
    Ok(serde_json::to_value(result)?)
}
