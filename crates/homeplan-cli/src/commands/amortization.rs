use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homeplan_core::amortization::deduction::{
    self, InterestDeductionInput, DEFAULT_ANALYSIS_YEARS, STANDARD_DEDUCTION,
};
use homeplan_core::amortization::schedule::{self, AmortizationInput, LoanTerms};

use crate::input;

/// Loan terms shared by the payment and schedule commands
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (6.5 = 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in years
    #[arg(long, default_value_t = 30)]
    pub years: u32,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Closing date (YYYY-MM-DD); enables payment and payoff dates
    #[arg(long)]
    pub start_date: Option<NaiveDate>,
}

/// Arguments for the mortgage interest deduction estimate
#[derive(Args)]
pub struct DeductionArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// Marginal federal tax rate in percent
    #[arg(long)]
    pub marginal_rate: Option<Decimal>,

    /// Years of the loan to average
    #[arg(long, default_value_t = DEFAULT_ANALYSIS_YEARS)]
    pub analysis_years: u32,

    /// Standard deduction to compare against
    #[arg(long)]
    pub standard_deduction: Option<Decimal>,
}

impl LoanArgs {
    fn terms(&self) -> Result<LoanTerms, Box<dyn std::error::Error>> {
        Ok(LoanTerms {
            principal: self
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: self.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: self.years,
        })
    }
}

fn amortization_input(args: &AmortizeArgs) -> Result<AmortizationInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.loan.input {
        input::file::read_input(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Ok(AmortizationInput {
            loan: args.loan.terms()?,
            start_date: args.start_date,
        })
    }
}

pub fn run_payment(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let terms: LoanTerms = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        args.terms()?
    };

    let result = schedule::calculate_payment(&terms);
    Ok(serde_json::to_value(result)?)
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input = amortization_input(&args)?;
    let result = schedule::build_amortization(&amort_input);
    Ok(serde_json::to_value(result)?)
}

/// Same computation as `amortize`, reporting only the per-year roll-up.
pub fn run_yearly_summary(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input = amortization_input(&args)?;
    let result = schedule::build_amortization(&amort_input);
    let yearly = serde_json::to_value(&result.result.yearly_summary)?;

    let mut value = serde_json::to_value(result)?;
    value["result"] = yearly;
    Ok(value)
}

pub fn run_interest_deduction(args: DeductionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deduction_input: InterestDeductionInput = if let Some(ref path) = args.loan.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        InterestDeductionInput {
            loan: args.loan.terms()?,
            marginal_tax_rate_pct: args
                .marginal_rate
                .ok_or("--marginal-rate is required (or provide --input)")?,
            analysis_years: args.analysis_years,
            standard_deduction: args.standard_deduction.unwrap_or(STANDARD_DEDUCTION),
        }
    };

    let result = deduction::analyze_interest_deduction(&deduction_input);
    Ok(serde_json::to_value(result)?)
}
