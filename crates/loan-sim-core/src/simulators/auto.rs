use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{rate_source, LoanCategory, SimulatorConfig};
use crate::error::LoanSimError;
use crate::time_value::{amortization_schedule, loan_result, LoanTerms, ScheduleRow};
use crate::types::*;
use crate::validation;
use crate::LoanSimResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoLoanInput {
    /// Price of the vehicle.
    pub asset_value: Option<Money>,
    /// Cash paid upfront; treated as zero when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    pub term_months: Option<Decimal>,
    /// Nominal annual rate in percent; the configured auto rate when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_rate_percent: Option<Percent>,
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLoanOutput {
    pub financed_amount: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleRow>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Vehicle financing: asset value less down payment, amortised at a fixed rate.
pub fn simulate_auto_loan(
    input: &AutoLoanInput,
    config: &SimulatorConfig,
) -> LoanSimResult<ComputationOutput<AutoLoanOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let asset_value = validation::require_positive("asset_value", input.asset_value)?;
    let down_payment = validation::optional_non_negative("down_payment", input.down_payment)?;
    let term_months =
        validation::whole_months("term_months", validation::require("term_months", input.term_months)?)?;
    let rate = validation::non_negative(
        "annual_rate_percent",
        config.rates.resolve(LoanCategory::Auto, input.annual_rate_percent),
    )?;

    if down_payment >= asset_value {
        return Err(LoanSimError::CrossFieldViolation {
            fields: "down_payment, asset_value".into(),
            reason: "Down payment must be less than the vehicle value".into(),
        });
    }

    let terms = LoanTerms {
        principal: asset_value - down_payment,
        annual_rate_percent: rate,
        term_months,
    };
    let loan = loan_result(&terms)?;
    let schedule = if input.include_schedule {
        Some(amortization_schedule(&terms)?)
    } else {
        None
    };

    let output = AutoLoanOutput {
        financed_amount: terms.principal,
        annual_rate_percent: rate,
        term_months,
        monthly_payment: loan.monthly_payment,
        total_paid: loan.total_paid,
        total_interest: loan.total_interest,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "asset_value": asset_value.to_string(),
        "down_payment": down_payment.to_string(),
        "rate_source": rate_source(input.annual_rate_percent),
    });

    Ok(with_metadata(
        "Auto loan (fixed-rate annuity on asset value less down payment)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
