//! The enrichment aggregate returned to callers

use serde::{Deserialize, Serialize};

use super::{CrimeRecord, Place, SeasonalWeather};

/// Everything known about a point, built per request and never stored by the core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEnrichment {
    pub lat: f64,
    pub lon: f64,
    /// Search radius in meters
    pub radius: f64,
    pub places: Vec<Place>,
    /// Subset of `places` tagged as parking
    pub parking_spaces: Vec<Place>,
    pub traffic_level: String,
    pub wind: Vec<SeasonalWeather>,
    pub crimes: Vec<CrimeRecord>,
}
