use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{rate_source, LoanCategory, SimulatorConfig};
use crate::error::LoanSimError;
use crate::policy::effort_rate::{assess, EffortAssessment, EffortTier};
use crate::time_value::{amortization_schedule, loan_result, LoanTerms, ScheduleRow};
use crate::types::*;
use crate::validation;
use crate::LoanSimResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MortgageInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_value: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_payment: Option<Money>,
    /// Amount to finance as shown in the form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financed_amount: Option<Money>,
    /// Set by the caller once the user has typed over the derived amount;
    /// `financed_amount` is then taken as-is.
    pub financed_amount_overridden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_years: Option<Decimal>,
    /// Caps the term through the age table; also supplies the term when
    /// `term_years` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_rate_percent: Option<Percent>,
    /// Enables the effort check when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_payments: Option<Money>,
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageOutput {
    pub financed_amount: Money,
    /// Financed amount over property value, when the value is known.
    pub loan_to_value_percent: Option<Percent>,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    pub max_term_years: Option<u32>,
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Effort with the new payment included, under the lending scheme.
    pub effort: Option<EffortAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<ScheduleRow>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value the form pre-fills into the financed-amount field.
pub fn derived_financed_amount(property_value: Money, down_payment: Money) -> Money {
    (property_value - down_payment).max(Decimal::ZERO)
}

/// Amount to finance: the caller's override, the property value less down
/// payment, or a bare financed amount when no property value was given.
pub fn resolve_financed_amount(input: &MortgageInput) -> LoanSimResult<Money> {
    if input.financed_amount_overridden {
        return validation::require_positive("financed_amount", input.financed_amount);
    }

    match input.property_value {
        Some(value) => {
            let value = validation::positive("property_value", value)?;
            let down = validation::optional_non_negative("down_payment", input.down_payment)?;
            let derived = derived_financed_amount(value, down);
            if derived.is_zero() {
                return Err(LoanSimError::CrossFieldViolation {
                    fields: "down_payment, property_value".into(),
                    reason: "Down payment must be less than the property value".into(),
                });
            }
            Ok(derived)
        }
        None => match input.financed_amount {
            Some(amount) => validation::positive("financed_amount", amount),
            None => Err(LoanSimError::MissingField {
                field: "property_value".into(),
            }),
        },
    }
}

/// Home loan with age-capped term and an optional effort check.
pub fn simulate_mortgage(
    input: &MortgageInput,
    config: &SimulatorConfig,
) -> LoanSimResult<ComputationOutput<MortgageOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let financed = resolve_financed_amount(input)?;
    let rate = validation::non_negative(
        "annual_rate_percent",
        config.rates.resolve(LoanCategory::Mortgage, input.annual_rate_percent),
    )?;

    let max_term_months = input
        .applicant_age
        .map(|age| config.age_terms.max_term_months(age))
        .transpose()?;

    let term_months = match (input.term_years, max_term_months) {
        (Some(years), cap) => {
            let requested = validation::years_to_months("term_years", years)?;
            match cap {
                Some(cap_months) if requested > cap_months => {
                    warnings.push(format!(
                        "Requested term of {years} years exceeds the {}-year maximum for the applicant's age; capped",
                        cap_months / 12
                    ));
                    cap_months
                }
                _ => requested,
            }
        }
        (None, Some(cap_months)) => cap_months,
        (None, None) => {
            return Err(LoanSimError::MissingField {
                field: "term_years".into(),
            })
        }
    };

    // Validate the effort inputs before any computation.
    let effort_inputs = match input.monthly_income {
        Some(income) => Some((
            validation::positive("monthly_income", income)?,
            validation::optional_non_negative("existing_payments", input.existing_payments)?,
        )),
        None => None,
    };

    let terms = LoanTerms {
        principal: financed,
        annual_rate_percent: rate,
        term_months,
    };
    let loan = loan_result(&terms)?;

    let effort = match effort_inputs {
        Some((income, existing)) => {
            let obligations = existing
                .checked_add(loan.monthly_payment)
                .ok_or_else(|| LoanSimError::overflow("monthly obligations"))?;
            let a = assess(&config.lending_scheme, income, obligations)?;
            if a.tier == EffortTier::High {
                warnings.push(format!(
                    "Effort rate of {}% with this mortgage is above the lending limit",
                    a.rate_percent.round_dp(1)
                ));
            }
            Some(a)
        }
        None => None,
    };

    let loan_to_value = match input.property_value {
        Some(value) if value > Decimal::ZERO => Some(
            financed
                .checked_div(value)
                .and_then(|ratio| ratio.checked_mul(dec!(100)))
                .ok_or_else(|| LoanSimError::overflow("loan-to-value"))?,
        ),
        _ => None,
    };

    let schedule = if input.include_schedule {
        Some(amortization_schedule(&terms)?)
    } else {
        None
    };

    let output = MortgageOutput {
        financed_amount: financed,
        loan_to_value_percent: loan_to_value,
        annual_rate_percent: rate,
        term_months,
        max_term_years: max_term_months.map(|months| months / 12),
        monthly_payment: loan.monthly_payment,
        total_paid: loan.total_paid,
        total_interest: loan.total_interest,
        effort,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "financed_amount_overridden": input.financed_amount_overridden,
        "rate_source": rate_source(input.annual_rate_percent),
        "lending_scheme": config.lending_scheme,
        "note": "Indicative rate; actual conditions depend on bank assessment, spread and Euribor",
    });

    Ok(with_metadata(
        "Mortgage (fixed-rate annuity, age-capped term)",
        &assumptions,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn base_input() -> MortgageInput {
        MortgageInput {
            property_value: Some(dec!(200_000)),
            down_payment: Some(dec!(50_000)),
            term_years: Some(dec!(30)),
            ..MortgageInput::default()
        }
    }

    #[test]
    fn test_derived_amount() {
        let result = simulate_mortgage(&base_input(), &SimulatorConfig::default()).unwrap();
        let out = &result.result;
        assert_eq!(out.financed_amount, dec!(150_000));
        assert_eq!(out.loan_to_value_percent, Some(dec!(75)));
        assert_eq!(out.term_months, 360);
        assert!((out.monthly_payment - dec!(600.5096)).abs() < dec!(0.001));
        assert!(out.effort.is_none());
    }

    #[test]
    fn test_override_wins_over_derivation() {
        let input = MortgageInput {
            financed_amount: Some(dec!(120_000)),
            financed_amount_overridden: true,
            ..base_input()
        };
        let result = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap();
        assert_eq!(result.result.financed_amount, dec!(120_000));
        assert_eq!(result.result.loan_to_value_percent, Some(dec!(60)));
    }

    #[test]
    fn test_stale_amount_ignored_without_override() {
        let input = MortgageInput {
            financed_amount: Some(dec!(1)),
            ..base_input()
        };
        assert_eq!(resolve_financed_amount(&input).unwrap(), dec!(150_000));
    }

    #[test]
    fn test_bare_financed_amount() {
        let input = MortgageInput {
            financed_amount: Some(dec!(90_000)),
            term_years: Some(dec!(20)),
            ..MortgageInput::default()
        };
        let result = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap();
        assert_eq!(result.result.financed_amount, dec!(90_000));
        assert_eq!(result.result.loan_to_value_percent, None);
    }

    #[test]
    fn test_down_payment_covers_value() {
        let input = MortgageInput {
            down_payment: Some(dec!(250_000)),
            ..base_input()
        };
        let err = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap_err();
        assert!(matches!(err, LoanSimError::CrossFieldViolation { .. }));
    }

    #[test]
    fn test_derived_financed_amount_floors_at_zero() {
        assert_eq!(derived_financed_amount(dec!(100), dec!(150)), Decimal::ZERO);
        assert_eq!(derived_financed_amount(dec!(100), dec!(30)), dec!(70));
    }

    #[test]
    fn test_term_from_age() {
        let input = MortgageInput {
            term_years: None,
            applicant_age: Some(35),
            ..base_input()
        };
        let result = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap();
        assert_eq!(result.result.term_months, 444);
        assert_eq!(result.result.max_term_years, Some(37));
    }

    #[test]
    fn test_term_capped_by_age() {
        let input = MortgageInput {
            term_years: Some(dec!(40)),
            applicant_age: Some(60),
            ..base_input()
        };
        let result = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap();
        assert_eq!(result.result.term_months, 180);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_missing_term_and_age() {
        let input = MortgageInput {
            term_years: None,
            ..base_input()
        };
        let err = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap_err();
        match err {
            LoanSimError::MissingField { field } => assert_eq!(field, "term_years"),
            other => panic!("Expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn test_effort_with_lending_scheme() {
        let input = MortgageInput {
            monthly_income: Some(dec!(1000)),
            existing_payments: Some(dec!(100)),
            ..base_input()
        };
        let result = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap();
        let effort = result.result.effort.unwrap();
        // (100 + 600.51) / 1000 ≈ 70%
        assert!((effort.rate_percent - dec!(70.05)).abs() < dec!(0.01));
        assert_eq!(effort.tier, EffortTier::High);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_invalid_income_rejected() {
        let input = MortgageInput {
            monthly_income: Some(Decimal::ZERO),
            ..base_input()
        };
        let err = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap_err();
        match err {
            LoanSimError::InvalidNumeric { field, .. } => assert_eq!(field, "monthly_income"),
            other => panic!("Expected InvalidNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_loan_to_value_overflow_is_an_error() {
        let input = MortgageInput {
            property_value: Some(dec!(0.0000001)),
            financed_amount: Some(dec!(10_000_000_000_000_000_000_000)),
            financed_amount_overridden: true,
            term_years: Some(dec!(1)),
            ..MortgageInput::default()
        };
        let err = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap_err();
        assert!(matches!(err, LoanSimError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_effort_obligations_overflow_is_an_error() {
        let input = MortgageInput {
            monthly_income: Some(dec!(1000)),
            existing_payments: Some(Decimal::MAX),
            ..base_input()
        };
        let err = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap_err();
        assert!(matches!(err, LoanSimError::FinancialImpossibility(_)));
    }
}
