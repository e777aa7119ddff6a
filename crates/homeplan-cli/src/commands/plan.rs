use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use homeplan_core::plan::{self, CalculatorState, TimingComparisonInput};

use crate::input;

/// Arguments for the full plan evaluation
#[derive(Args)]
pub struct PlanArgs {
    /// Path to a calculator state file (JSON or YAML)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the purchase timing comparison
#[derive(Args)]
pub struct TimingArgs {
    /// Path to a file holding `state` and `timings` (JSON or YAML)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_plan(args: PlanArgs, as_of: NaiveDate) -> Result<Value, Box<dyn std::error::Error>> {
    let state: CalculatorState = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <state.json> or stdin required for plan evaluation".into());
    };

    let result = plan::run_plan(&state, as_of)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_timing(args: TimingArgs, as_of: NaiveDate) -> Result<Value, Box<dyn std::error::Error>> {
    let timing_input: TimingComparisonInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for timing comparison".into());
    };

    let result = plan::run_timing_comparison(&timing_input, as_of)?;
    Ok(serde_json::to_value(result)?)
}
