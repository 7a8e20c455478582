use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_sim_core::simulators::effort::{self, EffortRateInput};
use loan_sim_core::SimulatorConfig;

use crate::input;

/// Arguments for the effort-rate (debt-to-income) check
#[derive(Args)]
pub struct EffortRateArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Net monthly income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Sum of the monthly payments already committed
    #[arg(long)]
    pub existing_payments: Option<Decimal>,

    /// Monthly payment of the loan under consideration
    #[arg(long)]
    pub new_payment: Option<Decimal>,
}

pub fn run_effort_rate(
    args: EffortRateArgs,
    config: &SimulatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: EffortRateInput = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => EffortRateInput {
            monthly_income: args.income,
            existing_payments: args.existing_payments,
            new_payment: args.new_payment,
        },
    };

    let result = effort::simulate_effort_rate(&request, config)?;
    Ok(serde_json::to_value(result)?)
}
