use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_sim_core::simulators::auto::{self, AutoLoanInput};
use loan_sim_core::simulators::personal::{self, PersonalLoanInput};
use loan_sim_core::SimulatorConfig;

use crate::input;

/// Arguments for the auto loan simulator
#[derive(Args)]
pub struct AutoLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Vehicle price
    #[arg(long, alias = "value")]
    pub asset_value: Option<Decimal>,

    /// Cash paid upfront
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "months")]
    pub term_months: Option<Decimal>,

    /// Nominal annual rate in percent (defaults to the configured auto rate)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Include the month-by-month amortisation schedule
    #[arg(long)]
    pub schedule: bool,
}

/// Arguments for the personal loan simulator
#[derive(Args)]
pub struct PersonalLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Term in months
    #[arg(long, alias = "months")]
    pub term_months: Option<Decimal>,

    /// Nominal annual rate in percent (defaults to the configured personal rate)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Include the month-by-month amortisation schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_auto_loan(
    args: AutoLoanArgs,
    config: &SimulatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AutoLoanInput = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => AutoLoanInput {
            asset_value: args.asset_value,
            down_payment: args.down_payment,
            term_months: args.term_months,
            annual_rate_percent: args.annual_rate_percent,
            include_schedule: args.schedule,
        },
    };

    let result = auto::simulate_auto_loan(&request, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_personal_loan(
    args: PersonalLoanArgs,
    config: &SimulatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PersonalLoanInput = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => PersonalLoanInput {
            amount: args.amount,
            term_months: args.term_months,
            annual_rate_percent: args.annual_rate_percent,
            include_schedule: args.schedule,
        },
    };

    let result = personal::simulate_personal_loan(&request, config)?;
    Ok(serde_json::to_value(result)?)
}
