pub mod error;
pub mod loan;
pub mod types;

#[cfg(feature = "comparison")]
pub mod comparison;

pub use error::LoanError;
pub use types::*;

/// Standard result type for all loan-engine operations
pub type LoanResult<T> = Result<T, LoanError>;
