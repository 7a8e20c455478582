use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_sim_core::simulators::consolidation::{self, ConsolidationInput, ExistingLoan};
use loan_sim_core::SimulatorConfig;

use crate::input;

/// Arguments for the debt consolidation simulator
#[derive(Args)]
pub struct ConsolidationArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Existing loan as PRINCIPAL:MONTHLY_PAYMENT (repeatable)
    #[arg(long = "loan", value_parser = parse_loan)]
    pub loans: Vec<ExistingLoan>,

    /// Additional cash borrowed on top of the balances
    #[arg(long)]
    pub extra_cash: Option<Decimal>,

    /// Nominal annual rate of the new loan in percent
    #[arg(long, alias = "rate")]
    pub annual_rate_percent: Option<Decimal>,

    /// Term of the new loan in months
    #[arg(long, alias = "months")]
    pub term_months: Option<Decimal>,

    /// Age of the eldest applicant (sets the term when --term-months is absent)
    #[arg(long)]
    pub age: Option<u32>,

    /// Net monthly income, enables the before/after effort check
    #[arg(long)]
    pub income: Option<Decimal>,
}

fn parse_loan(raw: &str) -> Result<ExistingLoan, String> {
    let (principal, payment) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected PRINCIPAL:MONTHLY_PAYMENT, got '{raw}'"))?;
    let principal: Decimal = principal
        .trim()
        .parse()
        .map_err(|_| format!("invalid principal '{principal}'"))?;
    let monthly_payment: Decimal = payment
        .trim()
        .parse()
        .map_err(|_| format!("invalid monthly payment '{payment}'"))?;
    Ok(ExistingLoan {
        principal,
        monthly_payment,
    })
}

pub fn run_consolidation(
    args: ConsolidationArgs,
    config: &SimulatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: ConsolidationInput = match input::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => ConsolidationInput {
            loans: args.loans,
            extra_cash: args.extra_cash,
            annual_rate_percent: args.annual_rate_percent,
            term_months: args.term_months,
            applicant_age: args.age,
            monthly_income: args.income,
        },
    };
    tracing::debug!(loans = request.loans.len(), "consolidating");

    let result = consolidation::simulate_consolidation(&request, config)?;
    Ok(serde_json::to_value(result)?)
}
