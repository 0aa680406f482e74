//! Nominatim geocoding client
//!
//! Forward search resolves an administrative area to a bounding box; reverse
//! lookup breaks a point down into a [`ZoneIdentifier`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::error::ApiError;
use crate::http::read_json;
use crate::models::{BoundingBox, ZoneIdentifier};
use crate::providers::{BoundingBoxProvider, ZoneProvider};

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    /// `[min_lat, max_lat, min_lon, max_lon]`, as strings
    pub boundingbox: Vec<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReverseResult {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub address: Option<ZoneIdentifier>,
}

impl SearchResult {
    pub fn bounding_box(&self) -> Result<BoundingBox> {
        let [min_lat, max_lat, min_lon, max_lon] = self.boundingbox.as_slice() else {
            return Err(ApiError::response(format!(
                "bounding box has {} corners instead of 4",
                self.boundingbox.len()
            )));
        };
        BoundingBox::new(
            parse_degree(min_lat)?,
            parse_degree(max_lat)?,
            parse_degree(min_lon)?,
            parse_degree(max_lon)?,
        )
    }
}

fn parse_degree(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ApiError::response(format!("invalid coordinate in bounding box: {raw}")))
}

/// Free-text query for an administrative area
#[must_use]
pub fn search_text(parish: &str, municipality: &str, district: &str, country: &str) -> String {
    [parish, municipality, district, country]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Nominatim API client
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: Client,
    base_url: String,
    country: String,
    timeout: Duration,
}

impl NominatimClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        country: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            country: country.into(),
            timeout,
        }
    }
}

#[async_trait]
impl BoundingBoxProvider for NominatimClient {
    #[instrument(skip(self))]
    async fn fetch_bounding_box(
        &self,
        parish: &str,
        municipality: &str,
        district: &str,
    ) -> Result<Option<BoundingBox>> {
        let text = search_text(parish, municipality, district, &self.country);
        if text.is_empty() {
            return Err(ApiError::request("empty administrative area"));
        }

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .timeout(self.timeout)
            .query(&[("q", text.as_str()), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await?;
        let results: Vec<SearchResult> = read_json("Nominatim search", response).await?;

        match results.first() {
            Some(result) => {
                let bbox = result.bounding_box()?;
                info!(
                    "Resolved '{}' to {:?}",
                    result.display_name.as_deref().unwrap_or(&text),
                    bbox
                );
                Ok(Some(bbox))
            }
            None => {
                warn!("No geocoding match for '{}'", text);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl ZoneProvider for NominatimClient {
    #[instrument(skip(self))]
    async fn fetch_zone(&self, lat: f64, lon: f64) -> Result<ZoneIdentifier> {
        let response = self
            .http
            .get(format!("{}/reverse", self.base_url))
            .timeout(self.timeout)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "jsonv2".to_string()),
                ("addressdetails", "1".to_string()),
                ("zoom", "18".to_string()),
            ])
            .send()
            .await?;
        let result: ReverseResult = read_json("Nominatim reverse", response).await?;
        zone_from_reverse(result)
    }
}

pub fn zone_from_reverse(result: ReverseResult) -> Result<ZoneIdentifier> {
    if let Some(error) = result.error {
        return Err(ApiError::response(format!("reverse geocoding failed: {error}")));
    }
    let zone = result.address.unwrap_or_default();
    if zone.is_empty() {
        return Err(ApiError::response(
            "reverse geocoding returned no administrative breakdown",
        ));
    }
    debug!("Resolved zone {:?}", zone);
    Ok(zone)
}
