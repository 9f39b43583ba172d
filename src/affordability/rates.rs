//! Rate selection for multi-term affordability
//!
//! Live market rates come from an outside source and may be missing. The policy
//! here decides what to substitute; the affordability engine only ever sees the
//! resolved numbers.

use log::warn;
use serde::{Deserialize, Serialize};

/// Default 30-year rate used when no live quote is available
pub const DEFAULT_FALLBACK_30YR: f64 = 7.25;
/// Typical discount of a 15-year rate below the 30-year rate
pub const DEFAULT_SPREAD_15YR: f64 = 0.5;
/// Premium of a 50-year rate above the 30-year rate
pub const DEFAULT_SPREAD_50YR: f64 = 0.5;

/// Where a quoted rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    Live,
    Estimated,
}

/// A resolved annual rate for one loan horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateQuote {
    pub term_years: u32,
    pub annual_rate_percent: f64,
    pub source: RateSource,
}

impl RateQuote {
    /// Quote taken from the live rate source
    pub fn live(term_years: u32, annual_rate_percent: f64) -> Self {
        Self {
            term_years,
            annual_rate_percent,
            source: RateSource::Live,
        }
    }

    /// Quote substituted by the rate policy
    pub fn estimated(term_years: u32, annual_rate_percent: f64) -> Self {
        Self {
            term_years,
            annual_rate_percent,
            source: RateSource::Estimated,
        }
    }
}

/// Rates as reported by the rate source; `None` when unavailable
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LiveRates {
    pub rate_30yr: Option<f64>,
    pub rate_15yr: Option<f64>,
}

impl LiveRates {
    /// Create from whatever the rate source returned
    pub fn new(rate_30yr: Option<f64>, rate_15yr: Option<f64>) -> Self {
        Self { rate_30yr, rate_15yr }
    }

    /// No live rates at all
    pub fn unavailable() -> Self {
        Self::default()
    }
}

/// Quotes for the 15, 30 and 50 year horizons
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRates {
    pub quote_15yr: RateQuote,
    pub quote_30yr: RateQuote,
    pub quote_50yr: RateQuote,
}

impl ResolvedRates {
    /// Quotes in ascending term order
    pub fn quotes(&self) -> [RateQuote; 3] {
        [self.quote_15yr, self.quote_30yr, self.quote_50yr]
    }

    pub fn any_estimated(&self) -> bool {
        self.quotes().iter().any(|q| q.source == RateSource::Estimated)
    }
}

/// Fallback and spread policy applied when live rates are incomplete
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatePolicy {
    pub fallback_30yr: f64,
    pub spread_15yr: f64,
    pub spread_50yr: f64,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            fallback_30yr: DEFAULT_FALLBACK_30YR,
            spread_15yr: DEFAULT_SPREAD_15YR,
            spread_50yr: DEFAULT_SPREAD_50YR,
        }
    }
}

fn usable(rate: Option<f64>) -> Option<f64> {
    rate.filter(|r| r.is_finite() && *r > 0.0)
}

impl RatePolicy {
    /// Resolve one quote per horizon, substituting estimates for missing live rates
    pub fn resolve(&self, live: &LiveRates) -> ResolvedRates {
        let quote_30yr = match usable(live.rate_30yr) {
            Some(rate) => RateQuote::live(30, rate),
            None => {
                warn!("30-year rate unavailable, using fallback {}%", self.fallback_30yr);
                RateQuote::estimated(30, self.fallback_30yr)
            }
        };

        let quote_15yr = match usable(live.rate_15yr) {
            Some(rate) => RateQuote::live(15, rate),
            None => {
                let rate = quote_30yr.annual_rate_percent - self.spread_15yr;
                warn!("15-year rate unavailable, using estimated {}%", rate);
                RateQuote::estimated(15, rate)
            }
        };

        // No market quote exists for 50-year terms
        let quote_50yr = RateQuote::estimated(50, quote_30yr.annual_rate_percent + self.spread_50yr);

        ResolvedRates {
            quote_15yr,
            quote_30yr,
            quote_50yr,
        }
    }
}
