//! Fixed-payment amortizing loans: payment, total cost and schedule

pub mod formula;
mod engine;
mod schedule;

pub use engine::{AmortizationEngine, AmortizationResult, LoanParameters};
pub use schedule::{AmortizationSchedule, AmortizationScheduleEntry, ScheduleIter, ScheduleSummary};
