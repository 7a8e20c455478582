#![cfg(all(
    feature = "consumer_loans",
    feature = "consolidation",
    feature = "affordability",
    feature = "mortgage"
))]

use loan_sim_core::policy::effort_rate::{EffortRateScheme, EffortTier};
use loan_sim_core::simulators::affordability::{simulate_affordability, AffordabilityInput};
use loan_sim_core::simulators::auto::{simulate_auto_loan, AutoLoanInput};
use loan_sim_core::simulators::consolidation::{
    consolidate, simulate_consolidation, ConsolidationInput, ConsolidationSummary, ExistingLoan,
};
use loan_sim_core::simulators::mortgage::{simulate_mortgage, MortgageInput};
use loan_sim_core::{LoanSimError, PaymentChange, SimulatorConfig};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn existing_loans() -> Vec<ExistingLoan> {
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

// ===========================================================================
// Consolidation
// ===========================================================================

#[test]
fn test_consolidation_reference_case() {
    let summary = consolidate(&existing_loans(), Decimal::ZERO, dec!(2.60), 120).unwrap();

    assert_eq!(summary.total_principal, dec!(15_000));
    assert_eq!(summary.total_current_payment, dec!(450));
    // Annuity at r = 0.026/12, n = 120: 15000 * r / (1 - (1+r)^-120) ≈ 142.088
    assert!(
        (summary.new_payment - dec!(142.088)).abs() < dec!(0.001),
        "got {}",
        summary.new_payment
    );
    assert!((summary.monthly_delta - dec!(307.912)).abs() < dec!(0.001));
    assert_eq!(summary.outcome, PaymentChange::Savings);
}

#[test]
fn test_consolidation_simulation_matches_aggregator() {
    let input = ConsolidationInput {
        loans: existing_loans(),
        term_months: Some(dec!(120)),
        ..ConsolidationInput::default()
    };
    let result = simulate_consolidation(&input, &SimulatorConfig::default()).unwrap();
    let expected: ConsolidationSummary =
        consolidate(&existing_loans(), Decimal::ZERO, dec!(2.60), 120).unwrap();
    assert_eq!(result.result.summary, expected);
    assert_eq!(result.result.effort_before, None);
}

#[test]
fn test_consolidation_reads_json_with_blank_rows() {
    let input: ConsolidationInput = serde_json::from_str(
        r#"{
            "loans": [
                {"principal": "10000", "monthly_payment": "300"},
                {"principal": "5000", "monthly_payment": "150"},
                {}
            ],
            "term_months": 120
        }"#,
    )
    .unwrap();
    let result = simulate_consolidation(&input, &SimulatorConfig::default()).unwrap();
    assert_eq!(result.result.summary.total_principal, dec!(15_000));
}

// ===========================================================================
// Validation rules
// ===========================================================================

#[test]
fn test_auto_down_payment_equal_to_value() {
    let input = AutoLoanInput {
        asset_value: Some(dec!(10_000)),
        down_payment: Some(dec!(10_000)),
        term_months: Some(dec!(60)),
        ..AutoLoanInput::default()
    };
    let err = simulate_auto_loan(&input, &SimulatorConfig::default()).unwrap_err();
    match err {
        LoanSimError::CrossFieldViolation { fields, .. } => {
            assert_eq!(fields, "down_payment, asset_value")
        }
        other => panic!("Expected CrossFieldViolation, got {other:?}"),
    }
}

#[test]
fn test_affordability_without_margin() {
    let input = AffordabilityInput {
        monthly_income: Some(dec!(1_000)),
        existing_payments: Some(dec!(600)),
        ..AffordabilityInput::default()
    };
    let err = simulate_affordability(&input, &SimulatorConfig::default()).unwrap_err();
    assert!(matches!(err, LoanSimError::NoAffordabilityMargin { .. }));
    assert!(err.to_string().contains("No affordability margin"));
}

#[test]
fn test_single_error_reported_first_field_wins() {
    // Both the amount and the term are bad; the amount is checked first.
    let input = AutoLoanInput {
        asset_value: None,
        term_months: Some(dec!(-3)),
        ..AutoLoanInput::default()
    };
    let err = simulate_auto_loan(&input, &SimulatorConfig::default()).unwrap_err();
    match err {
        LoanSimError::MissingField { field } => assert_eq!(field, "asset_value"),
        other => panic!("Expected MissingField, got {other:?}"),
    }
}

// ===========================================================================
// Configuration as data
// ===========================================================================

#[test]
fn test_rate_table_override_changes_payment() {
    let config = SimulatorConfig::from_json(r#"{"rates": {"mortgage": "4.0"}}"#).unwrap();
    let input = MortgageInput {
        financed_amount: Some(dec!(100_000)),
        financed_amount_overridden: true,
        term_years: Some(dec!(25)),
        ..MortgageInput::default()
    };
    let default_run = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap();
    let custom_run = simulate_mortgage(&input, &config).unwrap();
    assert_eq!(custom_run.result.annual_rate_percent, dec!(4.0));
    assert!(custom_run.result.monthly_payment > default_run.result.monthly_payment);
}

#[test]
fn test_lending_scheme_is_configurable() {
    let config = SimulatorConfig {
        lending_scheme: EffortRateScheme::TwoTier {
            high_from: dec!(35),
        },
        ..SimulatorConfig::default()
    };
    let input = MortgageInput {
        financed_amount: Some(dec!(100_000)),
        financed_amount_overridden: true,
        term_years: Some(dec!(30)),
        monthly_income: Some(dec!(1_000)),
        existing_payments: Some(dec!(0)),
        ..MortgageInput::default()
    };
    // ≈ 400/1000 = 40%: acceptable under 50, high under 35
    let default_run = simulate_mortgage(&input, &SimulatorConfig::default()).unwrap();
    let strict_run = simulate_mortgage(&input, &config).unwrap();
    assert_eq!(default_run.result.effort.unwrap().tier, EffortTier::Acceptable);
    assert_eq!(strict_run.result.effort.unwrap().tier, EffortTier::High);
}

#[test]
fn test_envelope_metadata() {
    let input = AutoLoanInput {
        asset_value: Some(dec!(15_000)),
        term_months: Some(dec!(48)),
        ..AutoLoanInput::default()
    };
    let result = simulate_auto_loan(&input, &SimulatorConfig::default()).unwrap();
    assert_eq!(result.metadata.precision, "rust_decimal_128bit");
    assert!(!result.methodology.is_empty());
    assert_eq!(result.assumptions["rate_source"], "rate_table");
}
