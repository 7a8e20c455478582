use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::SimulatorConfig;
use crate::error::LoanSimError;
use crate::policy::effort_rate::{effort_rate_percent, EffortTier};
use crate::types::*;
use crate::validation;
use crate::LoanSimResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EffortRateInput {
    pub monthly_income: Option<Money>,
    /// Sum of the monthly payments already committed.
    pub existing_payments: Option<Money>,
    /// Monthly payment of a prospective new loan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_payment: Option<Money>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffortRateOutput {
    pub current_rate_percent: Percent,
    /// Present only when a positive new payment was supplied.
    pub rate_with_new_payment_percent: Option<Percent>,
    /// The rate the tier was assigned from.
    pub applied_rate_percent: Percent,
    pub tier: EffortTier,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Debt-to-income ratio before and after a prospective payment, banded with
/// the configured effort scheme.
pub fn simulate_effort_rate(
    input: &EffortRateInput,
    config: &SimulatorConfig,
) -> LoanSimResult<ComputationOutput<EffortRateOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let income = validation::require_positive("monthly_income", input.monthly_income)?;
    let existing = validation::require_non_negative("existing_payments", input.existing_payments)?;
    let new_payment = validation::optional_non_negative("new_payment", input.new_payment)?;

    let current = effort_rate_percent(income, existing)?;
    let with_new = if new_payment > Decimal::ZERO {
        let obligations = existing
            .checked_add(new_payment)
            .ok_or_else(|| LoanSimError::overflow("monthly obligations"))?;
        Some(effort_rate_percent(income, obligations)?)
    } else {
        None
    };

    let applied = with_new.unwrap_or(current);
    let tier = config.effort_scheme.classify(applied);

    if matches!(tier, EffortTier::Risky | EffortTier::High) {
        warnings.push(format!(
            "Effort rate of {}% is above the recommended limit",
            applied.round_dp(1)
        ));
    }

    let output = EffortRateOutput {
        current_rate_percent: current,
        rate_with_new_payment_percent: with_new,
        applied_rate_percent: applied,
        tier,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "scheme": config.effort_scheme,
        "new_payment": new_payment.to_string(),
    });

    Ok(with_metadata(
        "Effort rate (monthly debt service / monthly income)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
