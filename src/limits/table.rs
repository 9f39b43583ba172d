//! Jurisdiction -> conforming loan ceiling lookup

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use log::debug;

use super::loader::{self, LoadedState};
use crate::error::{LoanError, LoanResult};

/// FHFA 2026 one-unit limits, one row per state baseline or county override
const FHFA_2026_CSV: &str = include_str!("../../data/loan_limits.csv");

/// Year of the embedded data
pub const FHFA_2026_YEAR: u16 = 2026;
/// National baseline one-unit limit for 2026
pub const FHFA_2026_BASELINE: f64 = 832_750.0;

#[derive(Debug, Clone, PartialEq)]
struct StateLimits {
    /// Falls back to the national baseline when unset
    baseline: Option<f64>,
    counties: HashMap<String, f64>,
}

impl From<LoadedState> for StateLimits {
    fn from(loaded: LoadedState) -> Self {
        Self {
            baseline: loaded.baseline,
            counties: loaded.counties,
        }
    }
}

/// Immutable table of loan-size ceilings by state and county
#[derive(Debug, Clone, PartialEq)]
pub struct GeoLimitTable {
    year: u16,
    national_baseline: f64,
    states: HashMap<String, StateLimits>,
}

impl GeoLimitTable {
    /// Table from the FHFA 2026 data compiled into the crate
    pub fn fhfa_2026() -> LoanResult<Self> {
        Self::from_reader(FHFA_2026_CSV.as_bytes(), FHFA_2026_YEAR, FHFA_2026_BASELINE)
    }

    /// Load a table from a `State,County,Limit` CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P, year: u16, national_baseline: f64) -> LoanResult<Self> {
        let loaded = loader::load_limits(path)?;
        Self::from_loaded(loaded, year, national_baseline)
    }

    /// Load a table from `State,County,Limit` CSV data
    pub fn from_reader<R: Read>(reader: R, year: u16, national_baseline: f64) -> LoanResult<Self> {
        let loaded = loader::load_limits_from_reader(reader)?;
        Self::from_loaded(loaded, year, national_baseline)
    }

    fn from_loaded(loaded: HashMap<String, LoadedState>, year: u16, national_baseline: f64) -> LoanResult<Self> {
        // Classification divides by whatever limit a lookup returns
        if !national_baseline.is_finite() || national_baseline <= 0.0 {
            return Err(LoanError::Data(format!(
                "national baseline must be positive (got {})",
                national_baseline
            )));
        }

        let states: HashMap<String, StateLimits> =
            loaded.into_iter().map(|(name, state)| (name, state.into())).collect();
        debug!(
            "loan limit table {}: {} states, {} county overrides",
            year,
            states.len(),
            states.values().map(|s| s.counties.len()).sum::<usize>()
        );
        Ok(Self {
            year,
            national_baseline,
            states,
        })
    }

    /// Ceiling for a jurisdiction
    ///
    /// Unknown states get the national baseline. A known county override wins,
    /// otherwise the state baseline applies. An empty county is the same as none.
    pub fn get_limit(&self, state: &str, county: Option<&str>) -> f64 {
        let Some(state_limits) = self.states.get(state) else {
            return self.national_baseline;
        };

        if let Some(limit) = county
            .filter(|c| !c.is_empty())
            .and_then(|c| state_limits.counties.get(c))
        {
            return *limit;
        }

        state_limits.baseline.unwrap_or(self.national_baseline)
    }

    /// Get the national baseline limit
    pub fn national_baseline(&self) -> f64 {
        self.national_baseline
    }

    /// Get the data year
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Whether the table has an entry for `state`
    pub fn contains_state(&self, state: &str) -> bool {
        self.states.contains_key(state)
    }

    /// State names, sorted
    pub fn states(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.states.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Counties with an override in `state`, sorted; empty for unknown states
    pub fn counties(&self, state: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .states
            .get(state)
            .map(|s| s.counties.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// States whose name contains `query`, ignoring case
    pub fn search_states(&self, query: &str) -> Vec<&str> {
        filter_matches(self.states(), query)
    }

    /// Counties in `state` whose name contains `query`, ignoring case
    pub fn search_counties(&self, state: &str, query: &str) -> Vec<&str> {
        filter_matches(self.counties(state), query)
    }
}

fn filter_matches<'a>(names: Vec<&'a str>, query: &str) -> Vec<&'a str> {
    let query = query.trim().to_uppercase();
    if query.is_empty() {
        return Vec::new();
    }
    names
        .into_iter()
        .filter(|name| name.to_uppercase().contains(&query))
        .collect()
}
