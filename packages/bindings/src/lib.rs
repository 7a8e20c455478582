use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use loan_sim_core::{LoanSimResult, SimulatorConfig};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Decode `input_json`, run `simulate` under the optional config and encode
/// the result envelope.
fn run<I, O>(
    input_json: &str,
    config_json: Option<String>,
    simulate: impl FnOnce(&I, &SimulatorConfig) -> LoanSimResult<O>,
) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let config = match config_json {
        Some(json) => SimulatorConfig::from_json(&json).map_err(to_napi_error)?,
        None => SimulatorConfig::default(),
    };
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = simulate(&input, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

fn parse_decimal(field: &str, raw: &str) -> NapiResult<Decimal> {
    loan_sim_core::validation::parse_field(field, raw)
        .and_then(|v| loan_sim_core::validation::require(field, v))
        .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Simulators
// ---------------------------------------------------------------------------

#[napi]
pub fn effort_rate(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    run(
        &input_json,
        config_json,
        loan_sim_core::simulators::effort::simulate_effort_rate,
    )
}

#[napi]
pub fn auto_loan(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    run(
        &input_json,
        config_json,
        loan_sim_core::simulators::auto::simulate_auto_loan,
    )
}

#[napi]
pub fn personal_loan(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    run(
        &input_json,
        config_json,
        loan_sim_core::simulators::personal::simulate_personal_loan,
    )
}

#[napi]
pub fn mortgage(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    run(
        &input_json,
        config_json,
        loan_sim_core::simulators::mortgage::simulate_mortgage,
    )
}

#[napi]
pub fn consolidation(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    run(
        &input_json,
        config_json,
        loan_sim_core::simulators::consolidation::simulate_consolidation,
    )
}

#[napi]
pub fn affordability(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    run(
        &input_json,
        config_json,
        loan_sim_core::simulators::affordability::simulate_affordability,
    )
}

// ---------------------------------------------------------------------------
// Form helpers
// ---------------------------------------------------------------------------

/// Financed amount the mortgage form pre-fills from value and down payment.
#[napi]
pub fn derived_financed_amount(property_value: String, down_payment: String) -> NapiResult<String> {
    let value = parse_decimal("property_value", &property_value)?;
    let down = loan_sim_core::validation::parse_field("down_payment", &down_payment)
        .map_err(to_napi_error)?
        .unwrap_or(Decimal::ZERO);
    Ok(loan_sim_core::simulators::mortgage::derived_financed_amount(value, down).to_string())
}

/// Monthly payment for a principal, annual percentage rate and term in months.
#[napi]
pub fn monthly_payment(
    principal: String,
    annual_rate_percent: String,
    term_months: u32,
) -> NapiResult<String> {
    let principal = parse_decimal("principal", &principal)?;
    let rate = parse_decimal("annual_rate_percent", &annual_rate_percent)?;
    let payment = loan_sim_core::time_value::monthly_payment(
        principal,
        loan_sim_core::time_value::monthly_rate(rate),
        term_months,
    )
    .map_err(to_napi_error)?;
    Ok(payment.to_string())
}

#[napi]
pub fn max_term_years(age: u32, config_json: Option<String>) -> NapiResult<u32> {
    let config = match config_json {
        Some(json) => SimulatorConfig::from_json(&json).map_err(to_napi_error)?,
        None => SimulatorConfig::default(),
    };
    config.age_terms.max_term_years(age).map_err(to_napi_error)
}
