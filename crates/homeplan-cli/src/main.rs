mod commands;
mod input;
mod output;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::{DtiArgs, ScenarioArgs, StressTestArgs};
use commands::amortization::{AmortizeArgs, DeductionArgs, LoanArgs};
use commands::costs::{ClosingCostsArgs, PmiArgs};
use commands::plan::{PlanArgs, TimingArgs};
use commands::property_tax::PropertyTaxArgs;
use commands::savings::SavingsGoalArgs;

/// Mortgage affordability and home-purchase planning
#[derive(Parser)]
#[command(
    name = "homeplan",
    version,
    about = "Mortgage affordability and home-purchase planning",
    long_about = "Decimal-precision mortgage affordability calculations: amortization, \
                  Texas property tax exemptions, DTI qualification, rate stress tests, \
                  PMI, closing costs, savings goals and the interest deduction."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Date treated as today (YYYY-MM-DD); defaults to the local date
    #[arg(long, global = true)]
    as_of: Option<NaiveDate>,

    /// Log calculation steps to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment for a fixed-rate loan
    Payment(LoanArgs),
    /// Month-by-month amortization schedule
    Amortize(AmortizeArgs),
    /// Amortization schedule rolled up by loan year
    YearlySummary(AmortizeArgs),
    /// Texas property tax with exemption stacking
    PropertyTax(PropertyTaxArgs),
    /// Housing cost against full, conservative and family-planning income
    Scenario(ScenarioArgs),
    /// Front-end and back-end debt-to-income qualification
    Dti(DtiArgs),
    /// Re-run DTI across interest rate shocks
    StressTest(StressTestArgs),
    /// PMI requirement, cost and removal month
    Pmi(PmiArgs),
    /// Closing cost estimate
    ClosingCosts(ClosingCostsArgs),
    /// Time and monthly savings needed to reach the purchase goal
    SavingsGoal(SavingsGoalArgs),
    /// Mortgage interest deduction estimate
    InterestDeduction(DeductionArgs),
    /// Evaluate a full calculator state
    Plan(PlanArgs),
    /// Compare candidate purchase dates
    Timing(TimingArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let as_of = cli.as_of.unwrap_or_else(|| Local::now().date_naive());
    tracing::debug!(%as_of, "starting");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Payment(args) => commands::amortization::run_payment(args),
        Commands::Amortize(args) => commands::amortization::run_amortize(args),
        Commands::YearlySummary(args) => commands::amortization::run_yearly_summary(args),
        Commands::PropertyTax(args) => commands::property_tax::run_property_tax(args),
        Commands::Scenario(args) => commands::affordability::run_scenario(args),
        Commands::Dti(args) => commands::affordability::run_dti(args),
        Commands::StressTest(args) => commands::affordability::run_stress_test(args),
        Commands::Pmi(args) => commands::costs::run_pmi(args),
        Commands::ClosingCosts(args) => commands::costs::run_closing_costs(args),
        Commands::SavingsGoal(args) => commands::savings::run_savings_goal(args, as_of),
        Commands::InterestDeduction(args) => commands::amortization::run_interest_deduction(args),
        Commands::Plan(args) => commands::plan::run_plan(args, as_of),
        Commands::Timing(args) => commands::plan::run_timing(args, as_of),
        Commands::Version => {
            println!("homeplan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
