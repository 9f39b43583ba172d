//! Revolving balance payoff under a fixed monthly payment
//!
//! No closed form is used: each month interest compounds onto the balance and the
//! payment (or the remaining balance, if smaller) comes off. The run stops when
//! the balance is cleared or after [`MAX_PAYOFF_MONTHS`].

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::amortization::formula::{validate_positive, validate_rate, MONTHS_PER_YEAR};
use crate::error::{LoanError, LoanResult};

/// Simulation horizon; bounds the work done for very small payments
pub const MAX_PAYOFF_MONTHS: u32 = 600;

/// Monthly decimal rate from an APR percentage (18 -> 0.015)
pub fn monthly_rate_from_apr(apr_percent: f64) -> f64 {
    apr_percent / MONTHS_PER_YEAR as f64 / 100.0
}

/// Validated payoff inputs
///
/// Only obtainable through [`PayoffParameters::new`]; the payment always exceeds
/// the first month's interest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayoffParameters {
    balance: f64,
    /// Monthly decimal rate (0.015 for 1.5% per month)
    monthly_rate: f64,
    payment: f64,
}

impl PayoffParameters {
    /// Validate and build payoff parameters
    pub fn new(balance: f64, monthly_rate: f64, payment: f64) -> LoanResult<Self> {
        validate_positive("balance", balance)?;
        validate_rate("monthly_rate", monthly_rate)?;
        validate_positive("payment", payment)?;

        let interest_only = balance * monthly_rate;
        if payment <= interest_only {
            return Err(LoanError::NonConvergentPayoff {
                payment,
                interest_only,
            });
        }

        Ok(Self {
            balance,
            monthly_rate,
            payment,
        })
    }

    /// Get the starting balance
    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Get the monthly decimal rate
    pub fn monthly_rate(&self) -> f64 {
        self.monthly_rate
    }

    /// Get the fixed monthly payment
    pub fn payment(&self) -> f64 {
        self.payment
    }
}

/// Outcome of a payoff simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffResult {
    /// Months simulated, at most [`MAX_PAYOFF_MONTHS`]
    pub months: u32,
    pub total_paid: f64,
    /// `total_paid` minus the starting balance
    pub total_interest: f64,
    /// Balance still owed when the run ended; zero unless the horizon was hit
    pub remaining_balance: f64,
    /// True when the run stopped at the horizon with a balance left
    pub capped: bool,
}

impl PayoffResult {
    /// Payoff time as years and months
    pub fn duration(&self) -> PayoffDuration {
        PayoffDuration::from_months(self.months)
    }
}

/// Payoff time split into years and months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffDuration {
    pub years: u32,
    pub months: u32,
}

impl PayoffDuration {
    /// Split a month count into years and months
    pub fn from_months(total: u32) -> Self {
        Self {
            years: total / MONTHS_PER_YEAR,
            months: total % MONTHS_PER_YEAR,
        }
    }

    /// Get the total number of months
    pub fn total_months(&self) -> u32 {
        self.years * MONTHS_PER_YEAR + self.months
    }
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("{} {}", n, unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

impl fmt::Display for PayoffDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.years > 0 {
            write!(f, "{}", plural(self.years, "year"))?;
            if self.months > 0 {
                write!(f, ", {}", plural(self.months, "month"))?;
            }
        } else {
            write!(f, "{}", plural(self.months, "month"))?;
        }
        write!(f, " ({} total months)", self.total_months())
    }
}

/// First month's split of the payment between interest and principal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub interest: f64,
    pub principal: f64,
    pub interest_percent: f64,
    pub principal_percent: f64,
}

/// Stateless payoff simulator
#[derive(Debug, Clone, Copy, Default)]
pub struct PayoffSimulator;

impl PayoffSimulator {
    /// Create a payoff simulator
    pub fn new() -> Self {
        Self
    }

    /// Interest-only amount the payment has to exceed
    pub fn minimum_payment(&self, balance: f64, monthly_rate: f64) -> f64 {
        balance * monthly_rate
    }

    /// Months and total cost to clear `balance` paying `payment` each month
    ///
    /// Fails with `NonConvergentPayoff` unless the payment exceeds the first
    /// month's interest.
    pub fn simulate(&self, balance: f64, monthly_rate: f64, payment: f64) -> LoanResult<PayoffResult> {
        let params = PayoffParameters::new(balance, monthly_rate, payment)?;
        Ok(self.simulate_params(&params))
    }

    /// Same as [`simulate`](Self::simulate) for already validated parameters
    pub fn simulate_params(&self, params: &PayoffParameters) -> PayoffResult {
        let mut remaining = params.balance;
        let mut total_paid = 0.0;
        let mut months = 0;

        while remaining > 0.0 && months < MAX_PAYOFF_MONTHS {
            remaining += remaining * params.monthly_rate;

            let actual_payment = params.payment.min(remaining);
            remaining -= actual_payment;
            total_paid += actual_payment;

            months += 1;
        }

        let capped = remaining > 0.0;
        if capped {
            warn!(
                "payoff stopped at {} month horizon with {:.2} still owed",
                MAX_PAYOFF_MONTHS, remaining
            );
        }
        debug!(
            "payoff: balance={} rate={} payment={} -> {} months",
            params.balance, params.monthly_rate, params.payment, months
        );

        PayoffResult {
            months,
            total_paid,
            total_interest: total_paid - params.balance,
            remaining_balance: remaining.max(0.0),
            capped,
        }
    }

    /// Interest and principal share of the first payment
    pub fn first_payment_breakdown(
        &self,
        balance: f64,
        monthly_rate: f64,
        payment: f64,
    ) -> LoanResult<PaymentBreakdown> {
        let params = PayoffParameters::new(balance, monthly_rate, payment)?;
        let interest = self.minimum_payment(params.balance, params.monthly_rate);
        let principal = params.payment - interest;

        Ok(PaymentBreakdown {
            interest,
            principal,
            interest_percent: interest / params.payment * 100.0,
            principal_percent: principal / params.payment * 100.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_credit_card_payoff() {
        let result = PayoffSimulator::new().simulate(5000.0, 20.0 / 1200.0, 200.0).unwrap();
        assert!(result.months > 0 && result.months <= MAX_PAYOFF_MONTHS);
        assert!(!result.capped);
        assert_relative_eq!(result.total_paid - result.total_interest, 5000.0, epsilon = 1e-6);
        // Final payment is partial
        assert!(result.total_paid < 200.0 * result.months as f64);
        assert!(result.total_paid > 200.0 * (result.months - 1) as f64);
    }

    #[test]
    fn test_payment_below_interest_rejected() {
        let err = PayoffSimulator::new().simulate(5000.0, 20.0 / 1200.0, 50.0).unwrap_err();
        match err {
            LoanError::NonConvergentPayoff { payment, interest_only } => {
                assert_eq!(payment, 50.0);
                assert!((interest_only - 83.3333).abs() < 1e-3);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_payment_equal_to_interest_rejected() {
        assert!(matches!(
            PayoffSimulator::new().simulate(1200.0, 0.01, 12.0),
            Err(LoanError::NonConvergentPayoff { .. })
        ));
    }

    #[test]
    fn test_params_only_from_validated_inputs() {
        assert!(matches!(
            PayoffParameters::new(-5.0, 0.01, 100.0),
            Err(LoanError::InvalidParameter { .. })
        ));
        assert!(matches!(
            PayoffParameters::new(5000.0, 0.02, 100.0),
            Err(LoanError::NonConvergentPayoff { .. })
        ));

        let params = PayoffParameters::new(5000.0, 0.015, 250.0).unwrap();
        assert_eq!(params.balance(), 5000.0);
        assert_eq!(params.monthly_rate(), 0.015);
        assert_eq!(params.payment(), 250.0);

        let sim = PayoffSimulator::new();
        assert_eq!(sim.simulate_params(&params), sim.simulate(5000.0, 0.015, 250.0).unwrap());
    }

    #[test]
    fn test_zero_rate() {
        let result = PayoffSimulator::new().simulate(1000.0, 0.0, 300.0).unwrap();
        assert_eq!(result.months, 4);
        assert_eq!(result.total_paid, 1000.0);
        assert_eq!(result.total_interest, 0.0);
    }

    #[test]
    fn test_horizon_cap() {
        // Barely above interest-only: would take far longer than 50 years
        let result = PayoffSimulator::new().simulate(10_000.0, 0.01, 100.01).unwrap();
        assert_eq!(result.months, MAX_PAYOFF_MONTHS);
        assert!(result.capped);
        assert!(result.remaining_balance > 0.0);
    }

    #[test]
    fn test_single_payment_clears_balance() {
        let result = PayoffSimulator::new().simulate(100.0, 0.01, 500.0).unwrap();
        assert_eq!(result.months, 1);
        assert_relative_eq!(result.total_paid, 101.0);
        assert_relative_eq!(result.total_interest, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(PayoffDuration::from_months(27).to_string(), "2 years, 3 months (27 total months)");
        assert_eq!(PayoffDuration::from_months(12).to_string(), "1 year (12 total months)");
        assert_eq!(PayoffDuration::from_months(13).to_string(), "1 year, 1 month (13 total months)");
        assert_eq!(PayoffDuration::from_months(5).to_string(), "5 months (5 total months)");
    }

    #[test]
    fn test_first_payment_breakdown() {
        let breakdown = PayoffSimulator::new()
            .first_payment_breakdown(6000.0, monthly_rate_from_apr(18.0), 300.0)
            .unwrap();
        assert_relative_eq!(breakdown.interest, 90.0, epsilon = 1e-9);
        assert_relative_eq!(breakdown.principal, 210.0, epsilon = 1e-9);
        assert_relative_eq!(breakdown.interest_percent + breakdown.principal_percent, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_monthly_rate_from_apr() {
        assert_relative_eq!(monthly_rate_from_apr(18.0), 0.015, epsilon = 1e-15);
    }
}
