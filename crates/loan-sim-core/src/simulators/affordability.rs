use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{rate_source, LoanCategory, SimulatorConfig};
use crate::error::LoanSimError;
use crate::time_value::{max_principal, monthly_rate};
use crate::types::*;
use crate::validation;
use crate::LoanSimResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffordabilityInput {
    pub monthly_income: Option<Money>,
    pub existing_payments: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_years: Option<Decimal>,
    /// Supplies the term through the age table when `term_years` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_rate_percent: Option<Percent>,
    /// Own funds added on top of the borrowable amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityOutput {
    /// Income share allowed for all debt service.
    pub max_total_payment: Money,
    /// What is left for the new loan after existing payments.
    pub available_payment: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    pub max_principal: Money,
    pub max_property_value: Money,
    pub total_paid: Money,
    pub total_interest: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Largest loan (and property value) whose payment fits under the income cap
/// once existing obligations are served.
pub fn simulate_affordability(
    input: &AffordabilityInput,
    config: &SimulatorConfig,
) -> LoanSimResult<ComputationOutput<AffordabilityOutput>> {
    let start = Instant::now();
    let warnings: Vec<String> = Vec::new();

    let income = validation::require_positive("monthly_income", input.monthly_income)?;
    let existing = validation::require_non_negative("existing_payments", input.existing_payments)?;

    let max_total = income
        .checked_mul(config.affordability_cap_percent)
        .map(|v| v / dec!(100))
        .ok_or_else(|| LoanSimError::overflow("maximum total payment"))?;
    let available = max_total - existing;
    if available <= Decimal::ZERO {
        return Err(LoanSimError::NoAffordabilityMargin {
            max_total_payment: max_total,
            existing_payments: existing,
        });
    }

    let down_payment = validation::optional_non_negative("down_payment", input.down_payment)?;
    let rate = validation::non_negative(
        "annual_rate_percent",
        config.rates.resolve(LoanCategory::Mortgage, input.annual_rate_percent),
    )?;
    let term_months = match (input.term_years, input.applicant_age) {
        (Some(years), _) => validation::years_to_months("term_years", years)?,
        (None, Some(age)) => config.age_terms.max_term_months(age)?,
        (None, None) => {
            return Err(LoanSimError::MissingField {
                field: "term_years".into(),
            })
        }
    };

    let principal = max_principal(available, monthly_rate(rate), term_months)?;
    let total_paid = available
        .checked_mul(Decimal::from(term_months))
        .ok_or_else(|| LoanSimError::overflow("total paid"))?;
    let max_property_value = principal
        .checked_add(down_payment)
        .ok_or_else(|| LoanSimError::overflow("maximum property value"))?;

    let output = AffordabilityOutput {
        max_total_payment: max_total,
        available_payment: available,
        annual_rate_percent: rate,
        term_months,
        max_principal: principal,
        max_property_value,
        total_paid,
        total_interest: total_paid - principal,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "affordability_cap_percent": config.affordability_cap_percent.to_string(),
        "rate_source": rate_source(input.annual_rate_percent),
        "down_payment": down_payment.to_string(),
    });

    Ok(with_metadata(
        "Affordability (reverse annuity on income headroom under the effort cap)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
