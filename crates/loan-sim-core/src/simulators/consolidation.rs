use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::config::{rate_source, LoanCategory, SimulatorConfig};
use crate::error::LoanSimError;
use crate::policy::effort_rate::{assess, EffortAssessment};
use crate::time_value::{loan_result, LoanTerms};
use crate::types::*;
use crate::validation;
use crate::LoanSimResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A debt being rolled into the consolidated loan. Blank form rows are zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExistingLoan {
    pub principal: Money,
    pub monthly_payment: Money,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsolidationInput {
    pub loans: Vec<ExistingLoan>,
    /// Additional cash borrowed on top of the consolidated balances.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_cash: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_rate_percent: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_months: Option<Decimal>,
    /// Supplies the longest allowed term when `term_months` is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant_age: Option<u32>,
    /// Enables the before/after effort check when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_income: Option<Money>,
}

/// Aggregate of the existing debts against the single replacement loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationSummary {
    pub total_principal: Money,
    pub total_current_payment: Money,
    pub new_payment: Money,
    /// `total_current_payment - new_payment`; positive is a monthly saving.
    pub monthly_delta: Money,
    pub outcome: PaymentChange,
    pub total_paid: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidationOutput {
    #[serde(flatten)]
    pub summary: ConsolidationSummary,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    pub effort_before: Option<EffortAssessment>,
    pub effort_after: Option<EffortAssessment>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Roll `items` (plus `extra_cash`) into one loan at the given rate and term.
pub fn consolidate(
    items: &[ExistingLoan],
    extra_cash: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> LoanSimResult<ConsolidationSummary> {
    for (i, item) in items.iter().enumerate() {
        validation::non_negative(&format!("loans[{i}].principal"), item.principal)?;
        validation::non_negative(&format!("loans[{i}].monthly_payment"), item.monthly_payment)?;
    }
    validation::non_negative("extra_cash", extra_cash)?;
    validation::non_negative("annual_rate_percent", annual_rate_percent)?;

    let total_principal = checked_total(
        "total principal",
        items.iter().map(|l| l.principal).chain(std::iter::once(extra_cash)),
    )?;
    let total_current = checked_total("total current payment", items.iter().map(|l| l.monthly_payment))?;

    if total_principal <= Decimal::ZERO {
        return Err(LoanSimError::InvalidNumeric {
            field: "total_principal".into(),
            reason: "At least one loan with an outstanding balance is required".into(),
        });
    }
    if total_current <= Decimal::ZERO {
        return Err(LoanSimError::InvalidNumeric {
            field: "total_current_payment".into(),
            reason: "At least one loan with a current monthly payment is required".into(),
        });
    }
    if term_months == 0 {
        return Err(LoanSimError::InvalidNumeric {
            field: "term_months".into(),
            reason: "New loan term must be > 0".into(),
        });
    }

    let loan = loan_result(&LoanTerms {
        principal: total_principal,
        annual_rate_percent,
        term_months,
    })?;
    let delta = total_current - loan.monthly_payment;

    Ok(ConsolidationSummary {
        total_principal,
        total_current_payment: total_current,
        new_payment: loan.monthly_payment,
        monthly_delta: delta,
        outcome: PaymentChange::from_delta(delta),
        total_paid: loan.total_paid,
        total_interest: loan.total_interest,
    })
}

fn checked_total(context: &str, mut amounts: impl Iterator<Item = Money>) -> LoanSimResult<Money> {
    amounts.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v).ok_or_else(|| LoanSimError::overflow(context))
    })
}

/// Debt consolidation scenario: term from the request or the age table,
/// rate from the request or the rate table.
pub fn simulate_consolidation(
    input: &ConsolidationInput,
    config: &SimulatorConfig,
) -> LoanSimResult<ComputationOutput<ConsolidationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let extra_cash = validation::optional_non_negative("extra_cash", input.extra_cash)?;
    let rate = validation::non_negative(
        "annual_rate_percent",
        config.rates.resolve(LoanCategory::Consolidation, input.annual_rate_percent),
    )?;
    let term_months = match (input.term_months, input.applicant_age) {
        (Some(months), _) => validation::whole_months("term_months", months)?,
        (None, Some(age)) => config.age_terms.max_term_months(age)?,
        (None, None) => {
            return Err(LoanSimError::MissingField {
                field: "term_months".into(),
            })
        }
    };
    let income = input
        .monthly_income
        .map(|v| validation::positive("monthly_income", v))
        .transpose()?;

    let summary = consolidate(&input.loans, extra_cash, rate, term_months)?;

    let (effort_before, effort_after) = match income {
        Some(income) => (
            Some(assess(&config.lending_scheme, income, summary.total_current_payment)?),
            Some(assess(&config.lending_scheme, income, summary.new_payment)?),
        ),
        None => (None, None),
    };

    if summary.outcome == PaymentChange::Savings {
        warnings.push(
            "A longer term can lower the monthly payment while increasing the total interest paid"
                .into(),
        );
    }

    let output = ConsolidationOutput {
        summary,
        annual_rate_percent: rate,
        term_months,
        effort_before,
        effort_after,
    };

    let term_source = if input.term_months.is_some() {
        "request"
    } else {
        "age_table"
    };
    let elapsed = start.elapsed().as_micros() as u64;
    let assumptions = serde_json::json!({
        "loans": input.loans.len(),
        "extra_cash": extra_cash.to_string(),
        "rate_source": rate_source(input.annual_rate_percent),
        "term_source": term_source,
    });

    Ok(with_metadata(
        "Debt consolidation (sum of balances re-amortised as one fixed-rate loan)",
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
    use crate::policy::effort_rate::EffortTier;
    use rust_decimal_macros::dec;

    fn two_loans() -> Vec<ExistingLoan> {
        vec![
            ExistingLoan {
                principal: dec!(10_000),
                monthly_payment: dec!(300),
            },
            ExistingLoan {
                principal: dec!(5_000),
                monthly_payment: dec!(150),
            },
        ]
    }

    #[test]
    fn test_aggregation() {
        let s = consolidate(&two_loans(), Decimal::ZERO, dec!(2.60), 120).unwrap();
        assert_eq!(s.total_principal, dec!(15_000));
        assert_eq!(s.total_current_payment, dec!(450));
        assert!((s.new_payment - dec!(142.088)).abs() < dec!(0.001), "got {}", s.new_payment);
        assert!((s.monthly_delta - dec!(307.912)).abs() < dec!(0.001));
        assert_eq!(s.outcome, PaymentChange::Savings);
    }

    #[test]
    fn test_extra_cash_added_to_principal() {
        let s = consolidate(&two_loans(), dec!(5_000), Decimal::ZERO, 100).unwrap();
        assert_eq!(s.total_principal, dec!(20_000));
        assert_eq!(s.new_payment, dec!(200));
        assert_eq!(s.monthly_delta, dec!(250));
    }

    #[test]
    fn test_increase_when_term_is_short() {
        let s = consolidate(&two_loans(), Decimal::ZERO, dec!(2.60), 12).unwrap();
        assert!(s.monthly_delta < Decimal::ZERO);
        assert_eq!(s.outcome, PaymentChange::Increase);
    }

    #[test]
    fn test_empty_loans_rejected() {
        let err = consolidate(&[], Decimal::ZERO, dec!(2.60), 120).unwrap_err();
        match err {
            LoanSimError::InvalidNumeric { field, .. } => assert_eq!(field, "total_principal"),
            other => panic!("Expected InvalidNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_no_current_payment_rejected() {
        let loans = vec![ExistingLoan {
            principal: dec!(1_000),
            monthly_payment: Decimal::ZERO,
        }];
        let err = consolidate(&loans, Decimal::ZERO, dec!(2.60), 120).unwrap_err();
        match err {
            LoanSimError::InvalidNumeric { field, .. } => assert_eq!(field, "total_current_payment"),
            other => panic!("Expected InvalidNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_term_rejected() {
        let err = consolidate(&two_loans(), Decimal::ZERO, dec!(2.60), 0).unwrap_err();
        match err {
            LoanSimError::InvalidNumeric { field, .. } => assert_eq!(field, "term_months"),
            other => panic!("Expected InvalidNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_row_names_index() {
        let mut loans = two_loans();
        loans[1].monthly_payment = dec!(-1);
        let err = consolidate(&loans, Decimal::ZERO, dec!(2.60), 120).unwrap_err();
        match err {
            LoanSimError::InvalidNumeric { field, .. } => assert_eq!(field, "loans[1].monthly_payment"),
            other => panic!("Expected InvalidNumeric, got {other:?}"),
        }
    }

    #[test]
    fn test_balance_overflow_is_an_error() {
        let loans = vec![
            ExistingLoan {
                principal: Decimal::MAX,
                monthly_payment: dec!(300),
            },
            ExistingLoan {
                principal: dec!(1),
                monthly_payment: dec!(150),
            },
        ];
        let err = consolidate(&loans, Decimal::ZERO, dec!(2.60), 120).unwrap_err();
        assert!(matches!(err, LoanSimError::FinancialImpossibility(_)));
    }

    #[test]
    fn test_simulation_with_age_term_and_effort() {
        let input = ConsolidationInput {
            loans: two_loans(),
            applicant_age: Some(45),
            monthly_income: Some(dec!(900)),
            ..ConsolidationInput::default()
        };
        let result = simulate_consolidation(&input, &SimulatorConfig::default()).unwrap();
        let out = &result.result;
        assert_eq!(out.term_months, 360);
        assert_eq!(out.annual_rate_percent, dec!(2.60));
        assert_eq!(out.effort_before.as_ref().unwrap().rate_percent, dec!(50));
        assert_eq!(out.effort_before.as_ref().unwrap().tier, EffortTier::High);
        assert_eq!(out.effort_after.as_ref().unwrap().tier, EffortTier::Acceptable);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_simulation_requires_term_or_age() {
        let input = ConsolidationInput {
            loans: two_loans(),
            ..ConsolidationInput::default()
        };
        let err = simulate_consolidation(&input, &SimulatorConfig::default()).unwrap_err();
        assert!(matches!(err, LoanSimError::MissingField { .. }));
    }

    #[test]
    fn test_output_flattens_summary() {
        let input = ConsolidationInput {
            loans: two_loans(),
            term_months: Some(dec!(120)),
            ..ConsolidationInput::default()
        };
        let result = simulate_consolidation(&input, &SimulatorConfig::default()).unwrap();
        let json = serde_json::to_value(&result.result).unwrap();
        assert_eq!(json["outcome"], "Savings");
        assert!(json.get("total_principal").is_some());
    }
}
