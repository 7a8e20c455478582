use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanSimError {
    #[error("Missing field: {field}")]
    MissingField { field: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidNumeric { field: String, reason: String },

    #[error("Inconsistent inputs: {fields} — {reason}")]
    CrossFieldViolation { fields: String, reason: String },

    #[error("No affordability margin: existing payments of {existing_payments} consume the maximum monthly commitment of {max_total_payment}")]
    NoAffordabilityMargin {
        max_total_payment: Decimal,
        existing_payments: Decimal,
    },

    #[error("Financial impossibility: {0}")]
    FinancialImpossibility(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanSimError {
    fn from(e: serde_json::Error) -> Self {
        LoanSimError::SerializationError(e.to_string())
    }
}

impl LoanSimError {
    /// Checked decimal arithmetic that left the 96-bit range.
    pub(crate) fn overflow(context: &str) -> Self {
        LoanSimError::FinancialImpossibility(format!("{context} exceeds decimal range"))
    }
}
