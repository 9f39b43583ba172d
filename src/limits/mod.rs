//! Conforming loan limits by jurisdiction and loan classification
//!
//! [`GeoLimitTable`] is loaded once and only read afterwards. It can be shared
//! between any number of [`LoanLimitClassifier`]s through an `Arc`.

mod classifier;
pub mod loader;
mod table;

pub use classifier::{format_currency, LoanClassification, LoanLimitClassifier, LoanType};
pub use loader::DEFAULT_LOAN_LIMITS_PATH;
pub use table::{GeoLimitTable, FHFA_2026_BASELINE, FHFA_2026_YEAR};
