use clap::Args;
use serde_json::{json, Value};

use loan_sim_core::SimulatorConfig;

/// Arguments for the age-to-term lookup
#[derive(Args)]
pub struct AgeTermArgs {
    /// Applicant age in years
    #[arg(long)]
    pub age: u32,
}

pub fn run_age_term(
    args: AgeTermArgs,
    config: &SimulatorConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let years = config.age_terms.max_term_years(args.age)?;
    let months = config.age_terms.max_term_months(args.age)?;
    Ok(json!({
        "result": {
            "age": args.age,
            "max_term_years": years,
            "max_term_months": months,
        }
    }))
}

/// Print the effective configuration (defaults merged with --config).
pub fn run_rates(config: &SimulatorConfig) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(json!({ "result": serde_json::to_value(&config.rates)?, "config": config }))
}
