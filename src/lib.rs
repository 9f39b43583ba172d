//! Loan Calculator - numeric engine for personal loan questions
//!
//! This library provides:
//! - Fixed-payment amortization (payment, total cost, month-by-month schedule)
//! - Affordability: the principal a monthly payment supports, per term and rate
//! - Revolving balance payoff simulation under a fixed payment
//! - Conforming vs. jumbo classification against FHFA county limits
//!
//! All calculators are stateless and take already-validated numbers; the limit
//! table is read-only once loaded.

pub mod error;
pub mod amortization;
pub mod affordability;
pub mod payoff;
pub mod limits;
pub mod calculator;

// Re-export commonly used types
pub use error::{LoanError, LoanResult};
pub use amortization::{AmortizationEngine, AmortizationResult, AmortizationSchedule, AmortizationScheduleEntry};
pub use affordability::{AffordabilityEngine, LiveRates, RatePolicy};
pub use payoff::{PayoffResult, PayoffSimulator, MAX_PAYOFF_MONTHS};
pub use limits::{GeoLimitTable, LoanClassification, LoanLimitClassifier, LoanType};
pub use calculator::{LoanCalculator, LoanRequest};
