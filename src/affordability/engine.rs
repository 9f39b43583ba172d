//! Principal supportable by a fixed monthly payment

use log::debug;
use serde::{Deserialize, Serialize};

use super::rates::{RateQuote, RateSource};
use crate::amortization::formula::{self, validate_positive, validate_rate, validate_term};
use crate::error::LoanResult;

/// Affordable principal at one term and rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffordabilityScenario {
    pub term_years: u32,
    pub annual_rate_percent: f64,
    pub source: RateSource,
    pub principal: f64,
    /// Payment times number of payments
    pub total_paid: f64,
    pub total_interest: f64,
}

/// Inverse of the amortization calculation. Holds no rate of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct AffordabilityEngine;

impl AffordabilityEngine {
    /// Create an affordability engine
    pub fn new() -> Self {
        Self
    }

    /// Principal that `monthly_payment` retires over `term_years` at the given rate
    pub fn compute_affordable_principal(
        &self,
        monthly_payment: f64,
        annual_rate_percent: f64,
        term_years: u32,
    ) -> LoanResult<f64> {
        validate_positive("monthly_payment", monthly_payment)?;
        validate_rate("annual_rate_percent", annual_rate_percent)?;
        let n = validate_term(term_years)?;

        let principal =
            formula::principal_for_payment(monthly_payment, formula::monthly_rate(annual_rate_percent), n);
        debug!(
            "affordability: payment={} rate={}% term={}y -> principal={:.2}",
            monthly_payment, annual_rate_percent, term_years, principal
        );
        Ok(principal)
    }

    /// One scenario per quote, in the order given
    pub fn scenarios(&self, monthly_payment: f64, quotes: &[RateQuote]) -> LoanResult<Vec<AffordabilityScenario>> {
        quotes
            .iter()
            .map(|quote| {
                let principal =
                    self.compute_affordable_principal(monthly_payment, quote.annual_rate_percent, quote.term_years)?;
                let total_paid = monthly_payment * (quote.term_years * formula::MONTHS_PER_YEAR) as f64;
                Ok(AffordabilityScenario {
                    term_years: quote.term_years,
                    annual_rate_percent: quote.annual_rate_percent,
                    source: quote.source,
                    principal,
                    total_paid,
                    total_interest: total_paid - principal,
                })
            })
            .collect()
    }
}
