//! Affordability: how much principal a monthly payment supports

mod engine;
mod rates;

pub use engine::{AffordabilityEngine, AffordabilityScenario};
pub use rates::{
    LiveRates, RatePolicy, RateQuote, RateSource, ResolvedRates, DEFAULT_FALLBACK_30YR, DEFAULT_SPREAD_15YR,
    DEFAULT_SPREAD_50YR,
};
