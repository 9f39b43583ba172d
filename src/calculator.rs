//! Service façade over the calculators
//!
//! Loads the limit table once, then answers any number of requests without
//! touching the data again. Cloning is cheap; clones share the table.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use csv::Reader;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::affordability::{AffordabilityEngine, AffordabilityScenario, LiveRates, RatePolicy, ResolvedRates};
use crate::amortization::{AmortizationEngine, AmortizationResult, AmortizationSchedule};
use crate::error::LoanResult;
use crate::limits::{GeoLimitTable, LoanClassification, LoanLimitClassifier};
use crate::payoff::{PayoffResult, PayoffSimulator};

/// One loan to classify
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    #[serde(rename = "Principal")]
    pub principal: f64,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "County", default)]
    pub county: Option<String>,
}

impl LoanRequest {
    /// Create a classification request
    pub fn new(principal: f64, state: impl Into<String>, county: Option<&str>) -> Self {
        Self {
            principal,
            state: state.into(),
            county: county.map(str::to_string),
        }
    }
}

/// Load classification requests (`Principal,State,County`) from any reader
pub fn load_requests_from_reader<R: Read>(reader: R) -> LoanResult<Vec<LoanRequest>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut requests = Vec::new();

    for result in csv_reader.deserialize() {
        let request: LoanRequest = result?;
        requests.push(request);
    }

    Ok(requests)
}

/// Load classification requests from a CSV file
pub fn load_requests<P: AsRef<Path>>(path: P) -> LoanResult<Vec<LoanRequest>> {
    let file = std::fs::File::open(path)?;
    load_requests_from_reader(file)
}

/// Affordable principal for each standard horizon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffordabilityReport {
    pub monthly_payment: f64,
    pub rates: ResolvedRates,
    pub scenarios: Vec<AffordabilityScenario>,
}

/// Pre-loaded calculator service for every loan operation
#[derive(Debug, Clone)]
pub struct LoanCalculator {
    amortization: AmortizationEngine,
    affordability: AffordabilityEngine,
    payoff: PayoffSimulator,
    classifier: LoanLimitClassifier,
    rate_policy: RatePolicy,
}

impl LoanCalculator {
    /// Calculator over the embedded FHFA data with the default rate policy
    pub fn new() -> LoanResult<Self> {
        Ok(Self::with_table(GeoLimitTable::fhfa_2026()?))
    }

    /// Calculator over a specific limit table
    pub fn with_table(table: GeoLimitTable) -> Self {
        Self::with_shared_table(Arc::new(table))
    }

    /// Calculator over a limit table shared with other owners
    pub fn with_shared_table(table: Arc<GeoLimitTable>) -> Self {
        Self {
            amortization: AmortizationEngine::new(),
            affordability: AffordabilityEngine::new(),
            payoff: PayoffSimulator::new(),
            classifier: LoanLimitClassifier::new(table),
            rate_policy: RatePolicy::default(),
        }
    }

    /// Replace the rate fallback policy
    pub fn with_rate_policy(mut self, policy: RatePolicy) -> Self {
        self.rate_policy = policy;
        self
    }

    /// Get the rate fallback policy
    pub fn rate_policy(&self) -> &RatePolicy {
        &self.rate_policy
    }

    /// Get the loan limit table
    pub fn limits(&self) -> &GeoLimitTable {
        self.classifier.table()
    }

    /// Monthly payment and total cost of an amortizing loan
    pub fn amortize(&self, principal: f64, annual_rate_percent: f64, term_years: u32) -> LoanResult<AmortizationResult> {
        self.amortization.compute(principal, annual_rate_percent, term_years)
    }

    /// Month-by-month amortization schedule
    pub fn schedule(
        &self,
        principal: f64,
        annual_rate_percent: f64,
        term_years: u32,
    ) -> LoanResult<AmortizationSchedule> {
        self.amortization.generate_schedule(principal, annual_rate_percent, term_years)
    }

    /// Principal a monthly payment supports at one rate and term
    pub fn affordable_principal(
        &self,
        monthly_payment: f64,
        annual_rate_percent: f64,
        term_years: u32,
    ) -> LoanResult<f64> {
        self.affordability
            .compute_affordable_principal(monthly_payment, annual_rate_percent, term_years)
    }

    /// 15, 30 and 50 year affordability using live rates where present and the
    /// configured policy elsewhere
    pub fn affordability_by_term(&self, monthly_payment: f64, live: &LiveRates) -> LoanResult<AffordabilityReport> {
        let rates = self.rate_policy.resolve(live);
        let scenarios = self.affordability.scenarios(monthly_payment, &rates.quotes())?;
        Ok(AffordabilityReport {
            monthly_payment,
            rates,
            scenarios,
        })
    }

    /// Simulate paying off a revolving balance
    pub fn payoff(&self, balance: f64, monthly_rate: f64, payment: f64) -> LoanResult<PayoffResult> {
        self.payoff.simulate(balance, monthly_rate, payment)
    }

    /// Get the payoff simulator
    pub fn payoff_simulator(&self) -> &PayoffSimulator {
        &self.payoff
    }

    /// Conforming or jumbo for a jurisdiction
    pub fn classify(&self, principal: f64, state: &str, county: Option<&str>) -> LoanClassification {
        self.classifier.classify(principal, state, county)
    }

    /// Get the loan limit classifier
    pub fn classifier(&self) -> &LoanLimitClassifier {
        &self.classifier
    }

    /// Classify many loans in parallel; output order matches input order
    pub fn classify_batch(&self, requests: &[LoanRequest]) -> Vec<LoanClassification> {
        requests
            .par_iter()
            .map(|r| self.classify(r.principal, &r.state, r.county.as_deref()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::affordability::RateSource;
    use crate::limits::LoanType;

    #[test]
    fn test_batch_preserves_order() {
        let calc = LoanCalculator::new().unwrap();
        let requests = vec![
            LoanRequest::new(900_000.0, "Alabama", None),
            LoanRequest::new(900_000.0, "California", Some("Los Angeles")),
            LoanRequest::new(400_000.0, "Unknown", None),
        ];

        let results = calc.classify_batch(&requests);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].loan_type, LoanType::Jumbo);
        assert_eq!(results[1].loan_type, LoanType::Conforming);
        assert_eq!(results[2].loan_type, LoanType::Conforming);
    }

    #[test]
    fn test_affordability_by_term_uses_policy() {
        let policy = RatePolicy {
            fallback_30yr: 6.0,
            ..Default::default()
        };
        let calc = LoanCalculator::new().unwrap().with_rate_policy(policy);
        let report = calc.affordability_by_term(2000.0, &LiveRates::unavailable()).unwrap();

        assert_eq!(report.scenarios.len(), 3);
        assert_eq!(report.rates.quote_30yr.annual_rate_percent, 6.0);
        assert!(report.scenarios.iter().all(|s| s.source == RateSource::Estimated));
        let direct = calc.affordable_principal(2000.0, 6.0, 30).unwrap();
        assert_eq!(report.scenarios[1].principal, direct);
    }

    #[test]
    fn test_clones_share_table() {
        let calc = LoanCalculator::new().unwrap();
        let copy = calc.clone();
        assert!(std::ptr::eq(calc.limits(), copy.limits()));
    }

    #[test]
    fn test_load_requests() {
        let data = "Principal,State,County\n750000,California,Orange\n900000,Texas,\n";
        let requests = load_requests_from_reader(data.as_bytes()).unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], LoanRequest::new(750_000.0, "California", Some("Orange")));
        assert_eq!(requests[1].county, None);
    }

    #[test]
    fn test_concurrent_use() {
        let calc = LoanCalculator::new().unwrap();
        std::thread::scope(|s| {
            for i in 0..4 {
                let calc = &calc;
                s.spawn(move || {
                    let result = calc.amortize(100_000.0 + i as f64, 5.0, 30).unwrap();
                    assert!(result.monthly_payment > 0.0);
                });
            }
        });
    }
}
