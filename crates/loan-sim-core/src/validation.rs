//! Field checks shared by every simulator entry point.
//!
//! Each helper names the offending field so the first failure can be shown
//! next to the input that caused it.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::error::LoanSimError;
use crate::types::Money;
use crate::LoanSimResult;

pub fn require<T>(field: &str, value: Option<T>) -> LoanSimResult<T> {
    value.ok_or_else(|| LoanSimError::MissingField {
        field: field.into(),
    })
}

pub fn positive(field: &str, value: Money) -> LoanSimResult<Money> {
    if value <= Decimal::ZERO {
        return Err(LoanSimError::InvalidNumeric {
            field: field.into(),
            reason: "Must be greater than zero".into(),
        });
    }
    Ok(value)
}

pub fn non_negative(field: &str, value: Money) -> LoanSimResult<Money> {
    if value < Decimal::ZERO {
        return Err(LoanSimError::InvalidNumeric {
            field: field.into(),
            reason: "Cannot be negative".into(),
        });
    }
    Ok(value)
}

pub fn require_positive(field: &str, value: Option<Money>) -> LoanSimResult<Money> {
    positive(field, require(field, value)?)
}

pub fn require_non_negative(field: &str, value: Option<Money>) -> LoanSimResult<Money> {
    non_negative(field, require(field, value)?)
}

/// Optional amount that defaults to zero when absent.
pub fn optional_non_negative(field: &str, value: Option<Money>) -> LoanSimResult<Money> {
    non_negative(field, value.unwrap_or(Decimal::ZERO))
}

/// Round a typed term to whole months, half away from zero.
pub fn whole_months(field: &str, value: Decimal) -> LoanSimResult<u32> {
    positive(field, value)?;
    let rounded = value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    match rounded.to_u32() {
        Some(months) if months > 0 => Ok(months),
        _ => Err(LoanSimError::InvalidNumeric {
            field: field.into(),
            reason: format!("{value} does not round to a usable number of months"),
        }),
    }
}

/// Convert a term in years to whole months.
pub fn years_to_months(field: &str, years: Decimal) -> LoanSimResult<u32> {
    positive(field, years)?;
    let months = years
        .checked_mul(dec!(12))
        .ok_or_else(|| LoanSimError::overflow(field))?;
    whole_months(field, months)
}

/// Parse a raw form value.
///
/// Blank input is a missing value; a lone comma is read as the decimal
/// separator ("8,1" == 8.1).
pub fn parse_field(field: &str, raw: &str) -> LoanSimResult<Option<Decimal>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let normalised = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };

    Decimal::from_str(&normalised)
        .map(Some)
        .map_err(|_| LoanSimError::InvalidNumeric {
            field: field.into(),
            reason: format!("'{trimmed}' is not a number"),
        })
}
