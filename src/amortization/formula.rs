//! Level-payment annuity algebra shared by the amortization and affordability engines
//!
//! Both directions of the problem (principal -> payment, payment -> principal) go
//! through [`payment_factor`], so a payment computed here always maps back to the
//! principal it came from.

use crate::error::{LoanError, LoanResult};

/// Months in a year; rates and terms are quoted annually, payments are monthly
pub const MONTHS_PER_YEAR: u32 = 12;

/// Convert an annual percentage rate (e.g. 6.5 for 6.5%) to a monthly decimal rate
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / MONTHS_PER_YEAR as f64
}

/// Longest accepted term; keeps schedules to at most 1,200 entries
pub const MAX_TERM_YEARS: u32 = 100;

/// Number of monthly payments for a term in whole years
pub fn number_of_payments(term_years: u32) -> LoanResult<u32> {
    if term_years > MAX_TERM_YEARS {
        return Err(LoanError::invalid(
            "term_years",
            format!("must be at most {} years (got {})", MAX_TERM_YEARS, term_years),
        ));
    }
    Ok(term_years * MONTHS_PER_YEAR)
}

/// Compound growth as `((1 + r)^n - 1, (1 + r)^n)`
///
/// Built from `ln_1p`/`exp_m1` so a rate too small to change `1.0 + r` still
/// yields a non-zero growth term.
fn growth(r: f64, n: u32) -> (f64, f64) {
    let growth_minus_one = (n as f64 * r.ln_1p()).exp_m1();
    (growth_minus_one, 1.0 + growth_minus_one)
}

/// Payment per unit of principal for `n` monthly payments at monthly rate `r`
///
/// * `r == 0`: straight-line, `1 / n`
/// * otherwise: `r(1+r)^n / ((1+r)^n - 1)`
pub fn payment_factor(r: f64, n: u32) -> f64 {
    if r == 0.0 {
        return 1.0 / n as f64;
    }
    let (gm1, g) = growth(r, n);
    r * g / gm1
}

/// Level monthly payment that retires `principal` over `n` months
pub fn payment_for_principal(principal: f64, r: f64, n: u32) -> f64 {
    if r == 0.0 {
        // Exact straight-line split
        return principal / n as f64;
    }
    principal * payment_factor(r, n)
}

/// Principal retired by a level `payment` over `n` months
///
/// Closed form `M((1+r)^n - 1) / (r(1+r)^n)`; zero rate gives `M * n`.
pub fn principal_for_payment(payment: f64, r: f64, n: u32) -> f64 {
    if r == 0.0 {
        return payment * n as f64;
    }
    let (gm1, g) = growth(r, n);
    payment * gm1 / (r * g)
}

/// Check a non-negative rate
pub(crate) fn validate_rate(field: &str, rate: f64) -> LoanResult<()> {
    if !rate.is_finite() {
        return Err(LoanError::invalid(field, "must be a finite number"));
    }
    if rate < 0.0 {
        return Err(LoanError::invalid(field, format!("must not be negative (got {})", rate)));
    }
    Ok(())
}

/// Check a strictly positive monetary amount
pub(crate) fn validate_positive(field: &str, value: f64) -> LoanResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(LoanError::invalid(
            field,
            format!("must be greater than zero (got {})", value),
        ));
    }
    Ok(())
}

/// Check a term in years and return the payment count
pub(crate) fn validate_term(term_years: u32) -> LoanResult<u32> {
    if term_years == 0 {
        return Err(LoanError::invalid("term_years", "must be at least one year"));
    }
    number_of_payments(term_years)
}
