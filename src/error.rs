//! Error types shared by every calculator in the crate

use thiserror::Error;

/// Errors returned by the loan calculators
#[derive(Debug, Error)]
pub enum LoanError {
    #[error("Invalid parameter: {field} ({reason})")]
    InvalidParameter { field: String, reason: String },

    #[error(
        "Payment {payment:.2} does not exceed the monthly interest charge {interest_only:.2}; the balance would never be paid off"
    )]
    NonConvergentPayoff { payment: f64, interest_only: f64 },

    #[error("Reference data error: {0}")]
    Data(String),
}

impl LoanError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        LoanError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for LoanError {
    fn from(e: csv::Error) -> Self {
        LoanError::Data(e.to_string())
    }
}

impl From<std::io::Error> for LoanError {
    fn from(e: std::io::Error) -> Self {
        LoanError::Data(e.to_string())
    }
}

pub type LoanResult<T> = Result<T, LoanError>;
