use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_sim_core::simulators::mortgage::{self, MortgageInput};
use loan_sim_core::SimulatorConfig;

use crate::input;

/// Arguments for the mortgage simulator
#[derive(Args)]
pub struct MortgageArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Property value
    #[arg(long)]
    pub property_value: Option<Decimal>,

    /// Down payment
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Amount to finance; used as-is instead of value minus down payment
    #[arg(long)]
    pub financed_amount: Option<Decimal>,

    /// Term in years (defaults to the age-table maximum when --age is given)
    #[arg(long, alias = "years")]
    pub term_years: Option<Decimal>,

    /// Age of the eldest applicant
    #[arg(long)]
    pub age: Option<u32>,

    /// Nominal annual rate in percent (defaults to the configured mortgage rate)
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Net monthly income, enables the effort check
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Sum of the monthly payments already committed
    #[arg(long)]
    pub existing_payments: Option<Decimal>,

    /// Include the month-by-month amortisation schedule
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_mortgage(
    args: MortgageArgs,
    config: &SimulatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: MortgageInput = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => MortgageInput {
            property_value: args.property_value,
            down_payment: args.down_payment,
            financed_amount_overridden: args.financed_amount.is_some(),
            financed_amount: args.financed_amount,
            term_years: args.term_years,
            applicant_age: args.age,
            annual_rate_percent: args.annual_rate_percent,
            monthly_income: args.income,
            existing_payments: args.existing_payments,
            include_schedule: args.schedule,
        },
    };

    let result = mortgage::simulate_mortgage(&request, config)?;
    Ok(serde_json::to_value(result)?)
}
