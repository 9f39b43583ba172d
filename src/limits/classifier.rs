//! Conforming vs. jumbo classification against a jurisdiction's ceiling

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use super::table::GeoLimitTable;

/// Loan size category relative to the conforming limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanType {
    Conforming,
    Jumbo,
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoanType::Conforming => write!(f, "Conforming"),
            LoanType::Jumbo => write!(f, "Jumbo"),
        }
    }
}

/// Classification of one principal against one jurisdiction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanClassification {
    pub is_conforming: bool,
    pub loan_type: LoanType,
    pub limit: f64,
    pub principal: f64,
    /// `principal - limit`; negative when under the ceiling
    pub difference: f64,
    /// Principal as a percentage of the ceiling, unrounded
    pub percentage_of_limit: f64,
}

impl fmt::Display for LoanClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_conforming {
            write!(
                f,
                "{} Loan ({} below limit)",
                self.loan_type,
                format_currency(self.limit - self.principal)
            )
        } else {
            write!(
                f,
                "{} Loan ({} above limit)",
                self.loan_type,
                format_currency(self.difference.abs())
            )
        }
    }
}

/// `$1,234,567.89`
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{}", sign, grouped, cents)
}

/// Classifies principals using a shared, read-only limit table
#[derive(Debug, Clone)]
pub struct LoanLimitClassifier {
    table: Arc<GeoLimitTable>,
}

impl LoanLimitClassifier {
    /// Create a classifier over a shared table
    pub fn new(table: Arc<GeoLimitTable>) -> Self {
        Self { table }
    }

    /// Get the underlying limit table
    pub fn table(&self) -> &GeoLimitTable {
        &self.table
    }

    /// Never fails: unknown jurisdictions are judged against the baseline
    pub fn classify(&self, principal: f64, state: &str, county: Option<&str>) -> LoanClassification {
        let limit = self.table.get_limit(state, county);
        let is_conforming = principal <= limit;

        debug!(
            "classify: principal={} state={:?} county={:?} limit={} conforming={}",
            principal, state, county, limit, is_conforming
        );

        LoanClassification {
            is_conforming,
            loan_type: if is_conforming {
                LoanType::Conforming
            } else {
                LoanType::Jumbo
            },
            limit,
            principal,
            difference: principal - limit,
            percentage_of_limit: principal / limit * 100.0,
        }
    }

    /// True when a principal would be jumbo even in the cheapest jurisdiction,
    /// i.e. a location is needed to classify it
    pub fn exceeds_national_baseline(&self, principal: f64) -> bool {
        principal > self.table.national_baseline()
    }
}
