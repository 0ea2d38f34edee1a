pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "loan_simulator")]
pub mod loan_simulator;

pub use error::LoanSimError;
pub use types::*;

/// Standard result type for all loan-sim operations
pub type LoanSimResult<T> = Result<T, LoanSimError>;
