use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homeplan_core::property_tax::texas::{self, PropertyTaxInput, TaxExemptions, VeteranDisability};

use crate::input;

/// Arguments for the Texas property tax calculation
#[derive(Args)]
pub struct PropertyTaxArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Home price (assessed value)
    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Combined local tax rate in percent
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Residence homestead exemption
    #[arg(long)]
    pub homestead: bool,

    /// Over-65 exemption
    #[arg(long)]
    pub over_65: bool,

    /// Disabled-person exemption
    #[arg(long)]
    pub disabled: bool,

    /// Disabled-veteran rating (0, 10, 30, 50, 70 or 100)
    #[arg(long, default_value_t = 0)]
    pub veteran_disability: u8,

    /// Local-option percentage exemption
    #[arg(long)]
    pub local_optional_pct: Option<Decimal>,

    /// Agricultural valuation
    #[arg(long)]
    pub agricultural: bool,

    /// Additional exemption amount
    #[arg(long)]
    pub custom_amount: Option<Decimal>,
}

pub fn run_property_tax(args: PropertyTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tax_input: PropertyTaxInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PropertyTaxInput {
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            tax_rate_pct: args
                .tax_rate
                .ok_or("--tax-rate is required (or provide --input)")?,
            exemptions: TaxExemptions {
                homestead: args.homestead,
                over_65: args.over_65,
                disabled: args.disabled,
                veteran_disability: VeteranDisability::try_from(args.veteran_disability)?,
                local_optional_pct: args.local_optional_pct.unwrap_or_default(),
                agricultural: args.agricultural,
                custom_amount: args.custom_amount.unwrap_or_default(),
            },
        }
    };

    let result = texas::calculate_property_tax(&tax_input);
    Ok(serde_json::to_value(result)?)
}
