use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{rate_source, LoanCategory, SimulatorConfig};
use crate::time_value::{amortization_schedule, loan_result, LoanTerms, ScheduleRow};
use crate::types::*;
use crate::validation;
use crate::LoanSimResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalLoanInput {
    pub amount: Option<Money>,
    pub term_months: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_rate_percent: Option<Percent>,
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalLoanOutput {
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleRow>>,
}

/// Unsecured personal loan at a fixed nominal rate.
pub fn simulate_personal_loan(
    input: &PersonalLoanInput,
    config: &SimulatorConfig,
) -> LoanSimResult<ComputationOutput<PersonalLoanOutput>> {
    let start = Instant::now();

    let amount = validation::require_positive("amount", input.amount)?;
    let term_months =
        validation::whole_months("term_months", validation::require("term_months", input.term_months)?)?;
    let rate = validation::non_negative(
        "annual_rate_percent",
        config.rates.resolve(LoanCategory::Personal, input.annual_rate_percent),
    )?;

    let terms = LoanTerms {
        principal: amount,
        annual_rate_percent: rate,
        term_months,
    };
    let loan = loan_result(&terms)?;
    let schedule = if input.include_schedule {
        Some(amortization_schedule(&terms)?)
    } else {
        None
    };

    let output = PersonalLoanOutput {
        annual_rate_percent: rate,
        term_months,
        monthly_payment: loan.monthly_payment,
        total_paid: loan.total_paid,
        total_interest: loan.total_interest,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "amount": amount.to_string(),
        "rate_source": rate_source(input.annual_rate_percent),
    });

    Ok(with_metadata(
        "Personal loan (fixed-rate annuity)",
        &assumptions,
        Vec::new(),
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanSimError;
    use rust_decimal_macros::dec;

    fn base_input() -> PersonalLoanInput {
        PersonalLoanInput {
            amount: Some(dec!(10_000)),
            term_months: Some(dec!(48)),
            annual_rate_percent: None,
            include_schedule: false,
        }
    }

    #[test]
    fn test_default_rate_payment() {
        let result = simulate_personal_loan(&base_input(), &SimulatorConfig::default()).unwrap();
        let out = &result.result;
        assert_eq!(out.annual_rate_percent, dec!(8.60));
        assert!((out.monthly_payment - dec!(246.9554)).abs() < dec!(0.001));
        assert_eq!(out.total_interest, out.total_paid - dec!(10_000));
    }

    #[test]
    fn test_fractional_term_rounds() {
        let input = PersonalLoanInput {
            term_months: Some(dec!(47.6)),
            ..base_input()
        };
        let result = simulate_personal_loan(&input, &SimulatorConfig::default()).unwrap();
        assert_eq!(result.result.term_months, 48);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let input = PersonalLoanInput {
            amount: Some(Decimal::ZERO),
            ..base_input()
        };
        let err = simulate_personal_loan(&input, &SimulatorConfig::default()).unwrap_err();
        match err {
            LoanSimError::InvalidNumeric { field, .. } => assert_eq!(field, "amount"),
            other => panic!("Expected InvalidNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_rate_rejected() {
        let input = PersonalLoanInput {
            annual_rate_percent: Some(dec!(-0.5)),
            ..base_input()
        };
        let err = simulate_personal_loan(&input, &SimulatorConfig::default()).unwrap_err();
        match err {
            LoanSimError::InvalidNumeric { field, .. } => assert_eq!(field, "annual_rate_percent"),
            other => panic!("Expected InvalidNumeric, got {other:?}"),
        }
    }
}
