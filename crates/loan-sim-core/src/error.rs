use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanSimError {
    #[error("Invalid amount: loan amount must be positive (got {loan_amount})")]
    InvalidAmount { loan_amount: Decimal },

    #[error("Invalid income: monthly income must be positive (got {monthly_income})")]
    InvalidIncome { monthly_income: Decimal },

    #[error("Invalid tenor: tenor must be at least 1 year")]
    InvalidTenor,

    #[error("Tenor exceeds maximum: {tenor_years} years requested, {loan_type} allows at most {max_tenor_years} years")]
    TenorExceedsMaximum {
        tenor_years: u32,
        max_tenor_years: u32,
        loan_type: String,
    },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid floating rate: {value}% is outside the allowed 5%–25% band")]
    InvalidFloatingRate { value: Decimal },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Schedule invariant violated at month {month}: {reason}")]
    ScheduleInvariant { month: u32, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanSimError {
    pub(crate) fn overflow(context: &str) -> Self {
        LoanSimError::Overflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for LoanSimError {
    fn from(e: serde_json::Error) -> Self {
        LoanSimError::SerializationError(e.to_string())
    }
}
