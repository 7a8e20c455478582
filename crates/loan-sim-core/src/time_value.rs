use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanSimError;
use crate::types::{Money, Percent, Rate};
use crate::LoanSimResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Principal, nominal annual rate and whole-month term of a fixed-rate loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
}

/// Payment and totals of a fully amortised fixed-rate loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
}

/// One month of an amortisation schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

/// Simple monthly rate from a nominal annual percentage (no compounding adjustment).
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / MONTHS_PER_YEAR
}

/// Fixed monthly payment that amortises `principal` over `n_months`.
///
/// `P * r(1+r)^n / ((1+r)^n - 1)`, evaluated as `P * r / (1 - (1+r)^-n)` so the
/// compounding factor never multiplies the principal directly.
pub fn monthly_payment(principal: Money, monthly_rate: Rate, n_months: u32) -> LoanSimResult<Money> {
    validate_positive("principal", principal)?;
    validate_rate_and_term(monthly_rate, n_months)?;

    let n = Decimal::from(n_months);
    if monthly_rate.is_zero() {
        return Ok(principal / n);
    }

    let discount = discounted_annuity_factor(monthly_rate, n_months)?;
    if discount.is_zero() {
        // Rate too small to register against 28 significant digits.
        return Ok(principal / n);
    }

    principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_div(discount))
        .ok_or_else(|| LoanSimError::overflow("monthly payment"))
}

/// Largest principal a fixed `target_payment` amortises over `n_months`.
pub fn max_principal(target_payment: Money, monthly_rate: Rate, n_months: u32) -> LoanSimResult<Money> {
    validate_positive("target_payment", target_payment)?;
    validate_rate_and_term(monthly_rate, n_months)?;

    let n = Decimal::from(n_months);
    if monthly_rate.is_zero() {
        return target_payment
            .checked_mul(n)
            .ok_or_else(|| LoanSimError::overflow("maximum principal"));
    }

    let discount = discounted_annuity_factor(monthly_rate, n_months)?;
    if discount.is_zero() {
        return target_payment
            .checked_mul(n)
            .ok_or_else(|| LoanSimError::overflow("maximum principal"));
    }

    target_payment
        .checked_mul(discount)
        .and_then(|v| v.checked_div(monthly_rate))
        .ok_or_else(|| LoanSimError::overflow("maximum principal"))
}

/// Payment and totals for a loan quoted with an annual percentage rate.
pub fn loan_result(terms: &LoanTerms) -> LoanSimResult<LoanResult> {
    validate_annual_rate(terms.annual_rate_percent)?;
    let payment = monthly_payment(
        terms.principal,
        monthly_rate(terms.annual_rate_percent),
        terms.term_months,
    )?;
    let total_paid = payment
        .checked_mul(Decimal::from(terms.term_months))
        .ok_or_else(|| LoanSimError::overflow("total paid"))?;

    Ok(LoanResult {
        monthly_payment: payment,
        total_paid,
        total_interest: total_paid - terms.principal,
    })
}

/// Month-by-month split of each payment into interest and principal.
///
/// The final row repays whatever balance remains, so the schedule always
/// closes at exactly zero.
pub fn amortization_schedule(terms: &LoanTerms) -> LoanSimResult<Vec<ScheduleRow>> {
    let LoanResult { monthly_payment: payment, .. } = loan_result(terms)?;
    let r = monthly_rate(terms.annual_rate_percent);

    let mut rows = Vec::with_capacity(terms.term_months as usize);
    let mut balance = terms.principal;

    for month in 1..=terms.term_months {
        let interest = balance * r;
        let (principal_part, paid) = if month == terms.term_months {
            (balance, balance + interest)
        } else {
            (payment - interest, payment)
        };
        balance -= principal_part;

        rows.push(ScheduleRow {
            month,
            payment: paid,
            interest,
            principal: principal_part,
            balance,
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `1 - (1+r)^-n`
fn discounted_annuity_factor(monthly_rate: Rate, n_months: u32) -> LoanSimResult<Decimal> {
    let factor = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(n_months))
        .ok_or_else(|| LoanSimError::overflow("compounding factor"))?;
    Ok(Decimal::ONE - Decimal::ONE / factor)
}

fn validate_positive(field: &str, value: Money) -> LoanSimResult<()> {
    if value <= Decimal::ZERO {
        return Err(LoanSimError::InvalidNumeric {
            field: field.into(),
            reason: "Must be greater than zero".into(),
        });
    }
    Ok(())
}

fn validate_rate_and_term(monthly_rate: Rate, n_months: u32) -> LoanSimResult<()> {
    if monthly_rate < Decimal::ZERO {
        return Err(LoanSimError::InvalidNumeric {
            field: "monthly_rate".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    if n_months == 0 {
        return Err(LoanSimError::InvalidNumeric {
            field: "n_months".into(),
            reason: "Number of months must be > 0".into(),
        });
    }
    Ok(())
}

fn validate_annual_rate(annual_rate_percent: Percent) -> LoanSimResult<()> {
    if annual_rate_percent < Decimal::ZERO {
        return Err(LoanSimError::InvalidNumeric {
            field: "annual_rate_percent".into(),
            reason: "Rate cannot be negative".into(),
        });
    }
    Ok(())
}
