//! Revolving-balance payoff simulation

mod simulator;

pub use simulator::{
    monthly_rate_from_apr, PaymentBreakdown, PayoffDuration, PayoffParameters, PayoffResult, PayoffSimulator,
    MAX_PAYOFF_MONTHS,
};
