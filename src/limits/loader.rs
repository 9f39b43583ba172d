//! CSV loader for conforming loan limit data
//!
//! Expected columns: `State,County,Limit`. A row with an empty County sets the
//! state's baseline; any other row is a county override.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::Reader;

use crate::error::{LoanError, LoanResult};

/// Default path to the limits file, relative to the working directory
pub const DEFAULT_LOAN_LIMITS_PATH: &str = "data/loan_limits.csv";

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "County")]
    county: Option<String>,
    #[serde(rename = "Limit")]
    limit: f64,
}

/// Limits for one state as read from file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedState {
    pub baseline: Option<f64>,
    pub counties: HashMap<String, f64>,
}

/// Load limits grouped by state from any reader
pub fn load_limits_from_reader<R: Read>(reader: R) -> LoanResult<HashMap<String, LoadedState>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut states: HashMap<String, LoadedState> = HashMap::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // +2: header row and 1-based lines
        let line = index + 2;

        let state = row.state.trim();
        if state.is_empty() {
            return Err(LoanError::Data(format!("line {}: missing State", line)));
        }
        if !row.limit.is_finite() || row.limit <= 0.0 {
            return Err(LoanError::Data(format!(
                "line {}: limit for {} must be positive (got {})",
                line, state, row.limit
            )));
        }

        let entry = states.entry(state.to_string()).or_default();
        match row.county.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            Some(county) => {
                entry.counties.insert(county.to_string(), row.limit);
            }
            None => entry.baseline = Some(row.limit),
        }
    }

    Ok(states)
}

/// Load limits grouped by state from a CSV file
pub fn load_limits<P: AsRef<Path>>(path: P) -> LoanResult<HashMap<String, LoadedState>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| LoanError::Data(format!("{}: {}", path.display(), e)))?;
    load_limits_from_reader(file)
}
