use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homeplan_core::costs::closing::{self, ClosingCostInput};
use homeplan_core::costs::pmi::{self, PmiInput, DEFAULT_PMI_RATE_PCT};

use crate::input;

/// Arguments for the PMI lifecycle calculation
#[derive(Args)]
pub struct PmiArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Annual PMI rate in percent of the loan
    #[arg(long)]
    pub pmi_rate: Option<Decimal>,

    /// Mortgage rate in percent; with --years, projects the removal month
    #[arg(long)]
    pub rate: Option<Decimal>,

    #[arg(long)]
    pub years: Option<u32>,
}

/// Arguments for the closing cost estimate.
///
/// Fee assumptions other than the defaults come from an input file.
#[derive(Args)]
pub struct ClosingCostsArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub home_price: Option<Decimal>,

    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub rate: Option<Decimal>,

    #[arg(long)]
    pub annual_tax: Option<Decimal>,

    #[arg(long)]
    pub annual_insurance: Option<Decimal>,
}

pub fn run_pmi(args: PmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pmi_input: PmiInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PmiInput {
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            annual_pmi_rate_pct: args.pmi_rate.unwrap_or(DEFAULT_PMI_RATE_PCT),
            annual_rate_pct: args.rate,
            term_years: args.years,
        }
    };

    let result = pmi::analyze_pmi(&pmi_input);
    Ok(serde_json::to_value(result)?)
}

pub fn run_closing_costs(args: ClosingCostsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let closing_input: ClosingCostInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ClosingCostInput {
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            annual_rate_pct: args.rate.ok_or("--rate is required (or provide --input)")?,
            annual_tax: args.annual_tax.unwrap_or_default(),
            annual_insurance: args.annual_insurance.unwrap_or_default(),
            assumptions: Default::default(),
        }
    };

    let result = closing::analyze_closing_costs(&closing_input);
    Ok(serde_json::to_value(result)?)
}
