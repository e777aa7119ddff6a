use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use homeplan_core::savings::goal::{
    self, SavingsGoalInput, DEFAULT_DOWN_PAYMENT_PCT, DEFAULT_RESERVE_MONTHS,
};

use crate::input;

/// Arguments for the savings goal projection
#[derive(Args)]
pub struct SavingsGoalArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub home_price: Option<Decimal>,

    /// Down payment target in percent of the price
    #[arg(long)]
    pub down_payment_pct: Option<Decimal>,

    #[arg(long)]
    pub closing_costs: Option<Decimal>,

    /// Months of housing cost to hold in reserve
    #[arg(long, default_value_t = DEFAULT_RESERVE_MONTHS)]
    pub reserve_months: u32,

    #[arg(long)]
    pub monthly_housing: Option<Decimal>,

    #[arg(long)]
    pub current_savings: Option<Decimal>,

    #[arg(long)]
    pub monthly_savings: Option<Decimal>,

    /// Date the goal should be met by (YYYY-MM-DD)
    #[arg(long)]
    pub target_date: Option<NaiveDate>,
}

pub fn run_savings_goal(
    args: SavingsGoalArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let goal_input: SavingsGoalInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SavingsGoalInput {
            home_price: args
                .home_price
                .ok_or("--home-price is required (or provide --input)")?,
            target_down_payment_pct: args.down_payment_pct.unwrap_or(DEFAULT_DOWN_PAYMENT_PCT),
            closing_costs: args.closing_costs.unwrap_or_default(),
            reserve_months: args.reserve_months,
            monthly_housing_cost: args.monthly_housing.unwrap_or_default(),
            current_savings: args.current_savings.unwrap_or_default(),
            monthly_savings_rate: args.monthly_savings.unwrap_or_default(),
            target_date: args.target_date,
        }
    };

    let result = goal::project_savings_goal(&goal_input, as_of);
    Ok(serde_json::to_value(result)?)
}
