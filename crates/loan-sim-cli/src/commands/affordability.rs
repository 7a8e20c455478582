use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_sim_core::simulators::affordability::{self, AffordabilityInput};
use loan_sim_core::SimulatorConfig;

use crate::input;

/// Arguments for the affordability ("how much can I borrow") simulator
#[derive(Args)]
pub struct AffordabilityArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Net monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Sum of the monthly payments already committed
    #[arg(long)]
    pub existing_payments: Option<Decimal>,

    /// Term in years (defaults to the age-table maximum when --age is given)
    #[arg(long, alias = "years")]
    pub term_years: Option<Decimal>,

    /// Age of the eldest applicant
    #[arg(long)]
    pub age: Option<u32>,

    /// Nominal annual rate in percent (defaults to the configured mortgage rate)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Own funds available for the purchase
    #[arg(long)]
    pub down_payment: Option<Decimal>,
}

pub fn run_affordability(
    args: AffordabilityArgs,
    config: &SimulatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: AffordabilityInput = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => AffordabilityInput {
            monthly_income: args.income,
            existing_payments: args.existing_payments,
            term_years: args.term_years,
            applicant_age: args.age,
            annual_rate_percent: args.annual_rate_percent,
            down_payment: args.down_payment,
        },
    };

    let result = affordability::simulate_affordability(&request, config)?;
    Ok(serde_json::to_value(result)?)
}
