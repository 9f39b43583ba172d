//! Closed-form cost of a fixed-payment amortizing loan

use log::debug;
use serde::{Deserialize, Serialize};

use super::formula::{self, validate_positive, validate_rate, validate_term};
use super::schedule::{AmortizationSchedule, ScheduleIter};
use crate::error::LoanResult;

/// Validated inputs for an amortizing loan
///
/// Only obtainable through [`LoanParameters::new`], so every instance has passed
/// the parameter checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoanParameters {
    principal: f64,
    /// Annual rate as a percentage (6.5 means 6.5%)
    annual_rate_percent: f64,
    term_years: u32,
}

impl LoanParameters {
    /// Validate and build loan parameters
    pub fn new(principal: f64, annual_rate_percent: f64, term_years: u32) -> LoanResult<Self> {
        validate_positive("principal", principal)?;
        validate_rate("annual_rate_percent", annual_rate_percent)?;
        validate_term(term_years)?;
        Ok(Self {
            principal,
            annual_rate_percent,
            term_years,
        })
    }

    /// Get the principal
    pub fn principal(&self) -> f64 {
        self.principal
    }

    /// Get the annual rate in percent
    pub fn annual_rate_percent(&self) -> f64 {
        self.annual_rate_percent
    }

    /// Get the term in years
    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    /// Get the monthly decimal rate
    pub fn monthly_rate(&self) -> f64 {
        formula::monthly_rate(self.annual_rate_percent)
    }

    /// Get the number of monthly payments
    pub fn number_of_payments(&self) -> u32 {
        // Term was bounded in new()
        self.term_years * formula::MONTHS_PER_YEAR
    }
}

/// Totals for an amortizing loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub monthly_payment: f64,
    pub total_amount: f64,
    pub total_interest: f64,
    /// Total interest as a percentage of principal
    pub interest_ratio: f64,
    pub number_of_payments: u32,
}

/// Stateless amortization calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct AmortizationEngine;

impl AmortizationEngine {
    /// Create an amortization engine
    pub fn new() -> Self {
        Self
    }

    /// Monthly payment, total cost and interest for a level-payment loan
    pub fn compute(
        &self,
        principal: f64,
        annual_rate_percent: f64,
        term_years: u32,
    ) -> LoanResult<AmortizationResult> {
        let params = LoanParameters::new(principal, annual_rate_percent, term_years)?;
        Ok(self.compute_params(&params))
    }

    /// Same as [`compute`](Self::compute) for parameters that are already validated
    pub fn compute_params(&self, params: &LoanParameters) -> AmortizationResult {
        let n = params.number_of_payments();
        let monthly_payment = formula::payment_for_principal(params.principal, params.monthly_rate(), n);

        let total_amount = monthly_payment * n as f64;
        let total_interest = total_amount - params.principal;
        let interest_ratio = total_interest / params.principal * 100.0;

        debug!(
            "amortization: principal={} rate={}% term={}y -> payment={:.4}",
            params.principal, params.annual_rate_percent, params.term_years, monthly_payment
        );

        AmortizationResult {
            monthly_payment,
            total_amount,
            total_interest,
            interest_ratio,
            number_of_payments: n,
        }
    }

    /// Full month-by-month schedule
    pub fn generate_schedule(
        &self,
        principal: f64,
        annual_rate_percent: f64,
        term_years: u32,
    ) -> LoanResult<AmortizationSchedule> {
        let schedule: AmortizationSchedule = self
            .schedule_iter(principal, annual_rate_percent, term_years)?
            .collect();
        debug!("amortization schedule generated: {} payments", schedule.len());
        Ok(schedule)
    }

    /// Lazily yields schedule entries; calling again restarts from month 1
    pub fn schedule_iter(
        &self,
        principal: f64,
        annual_rate_percent: f64,
        term_years: u32,
    ) -> LoanResult<ScheduleIter> {
        let params = LoanParameters::new(principal, annual_rate_percent, term_years)?;
        let result = self.compute_params(&params);
        Ok(ScheduleIter::new(
            params.principal,
            params.monthly_rate(),
            result.monthly_payment,
            result.number_of_payments,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanError;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_rate_straight_line() {
        let result = AmortizationEngine::new().compute(120_000.0, 0.0, 10).unwrap();
        assert_eq!(result.monthly_payment, 1000.0);
        assert_eq!(result.number_of_payments, 120);
        assert_eq!(result.total_interest, 0.0);
        assert_eq!(result.interest_ratio, 0.0);
    }

    #[test]
    fn test_thirty_year_mortgage() {
        let result = AmortizationEngine::new().compute(300_000.0, 6.5, 30).unwrap();
        // Standard 6.5% / 30yr payment on $300k
        assert!((result.monthly_payment - 1896.20).abs() < 0.01);
        assert_eq!(result.total_amount, result.monthly_payment * 360.0);
        assert_relative_eq!(result.total_interest, result.total_amount - 300_000.0);
        assert_relative_eq!(result.interest_ratio, result.total_interest / 300_000.0 * 100.0);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let engine = AmortizationEngine::new();
        for (p, r, t) in [(0.0, 5.0, 30), (-1.0, 5.0, 30), (100.0, -0.5, 30), (100.0, 5.0, 0)] {
            match engine.compute(p, r, t) {
                Err(LoanError::InvalidParameter { .. }) => {}
                other => panic!("expected InvalidParameter for ({}, {}, {}), got {:?}", p, r, t, other),
            }
        }
    }

    #[test]
    fn test_params_only_from_validated_inputs() {
        assert!(LoanParameters::new(-5.0, 5.0, 0).is_err());

        let params = LoanParameters::new(150_000.0, 4.5, 20).unwrap();
        assert_eq!(params.principal(), 150_000.0);
        assert_eq!(params.annual_rate_percent(), 4.5);
        assert_eq!(params.term_years(), 20);
        assert_eq!(params.number_of_payments(), 240);

        let engine = AmortizationEngine::new();
        assert_eq!(engine.compute_params(&params), engine.compute(150_000.0, 4.5, 20).unwrap());
    }

    #[test]
    fn test_tiny_rate_gives_finite_payment() {
        let engine = AmortizationEngine::new();
        let result = engine.compute(100_000.0, 1e-15, 30).unwrap();
        assert!(result.monthly_payment.is_finite());
        assert!(result.total_amount.is_finite());
        assert_relative_eq!(result.monthly_payment, 100_000.0 / 360.0, max_relative = 1e-9);
    }

    #[test]
    fn test_schedule_matches_result() {
        let engine = AmortizationEngine::new();
        let result = engine.compute(250_000.0, 5.0, 15).unwrap();
        let schedule = engine.generate_schedule(250_000.0, 5.0, 15).unwrap();

        assert_eq!(schedule.len(), result.number_of_payments as usize);
        let summary = schedule.summary();
        assert_relative_eq!(summary.total_payments, result.total_amount, max_relative = 1e-12);
        assert_relative_eq!(summary.total_interest, result.total_interest, max_relative = 1e-6);
    }
}
