use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, instrument};

use super::query::{ElementKind, TagFilter, bbox_query, radius_query};
use super::response::{parse_response, to_amenities, to_places, to_traffic_ways};
use crate::Result;
use crate::http::read_body;
use crate::models::{Amenity, BoundingBox, Place, TrafficWay};
use crate::providers::{AmenitiesProvider, PlacesProvider, TrafficProvider};

/// Tag keys that make a node interesting as a nearby place
pub const PLACE_KEYS: [&str; 4] = ["amenity", "shop", "leisure", "tourism"];

/// Overpass API client
#[derive(Debug, Clone)]
pub struct OverpassClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl OverpassClient {
    pub fn new(http: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn interpret(&self, query: &str) -> Result<String> {
        debug!("Overpass query: {}", query);
        let response = self
            .http
            .post(format!("{}/interpreter", self.base_url))
            .timeout(self.timeout)
            .form(&[("data", query)])
            .send()
            .await?;
        read_body("Overpass", response).await
    }
}

#[async_trait]
impl PlacesProvider for OverpassClient {
    #[instrument(skip(self))]
    async fn fetch_places(&self, lat: f64, lon: f64, radius_m: f64) -> Result<Vec<Place>> {
        let filters: Vec<TagFilter> = PLACE_KEYS.iter().map(|key| TagFilter::key(*key)).collect();
        let query = radius_query(ElementKind::Node, &filters, lat, lon, radius_m);
        let body = self.interpret(&query).await?;
        let places = to_places(parse_response(&body)?);
        info!("Found {} places within {}m", places.len(), radius_m);
        Ok(places)
    }
}

#[async_trait]
impl TrafficProvider for OverpassClient {
    #[instrument(skip(self))]
    async fn fetch_traffic(&self, lat: f64, lon: f64, radius_m: f64) -> Result<Vec<TrafficWay>> {
        let query = radius_query(
            ElementKind::Way,
            &[TagFilter::key("highway")],
            lat,
            lon,
            radius_m,
        );
        let body = self.interpret(&query).await?;
        let ways = to_traffic_ways(parse_response(&body)?);
        debug!("Found {} highway ways", ways.len());
        Ok(ways)
    }
}

#[async_trait]
impl AmenitiesProvider for OverpassClient {
    #[instrument(skip(self, filters), fields(filters = filters.len()))]
    async fn fetch_amenities(
        &self,
        bbox: &BoundingBox,
        filters: &[TagFilter],
    ) -> Result<Vec<Amenity>> {
        let Some(query) = bbox_query(bbox, filters) else {
            debug!("No amenity filters, skipping Overpass request");
            return Ok(Vec::new());
        };
        let body = self.interpret(&query).await?;
        let amenities = to_amenities(parse_response(&body)?);
        info!("Found {} amenities in bounding box", amenities.len());
        Ok(amenities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_base_url() {
        let client = OverpassClient::new(
            Client::new(),
            "https://overpass-api.de/api/",
            Duration::from_secs(10),
        );
        assert_eq!(client.base_url, "https://overpass-api.de/api");
    }

    #[tokio::test]
    async fn test_empty_filters_make_no_request() {
        // nothing listens on this port; a request would fail
        let client = OverpassClient::new(
            Client::new(),
            "http://127.0.0.1:9",
            Duration::from_millis(200),
        );
        let bbox = BoundingBox::new(38.70, 38.72, -9.15, -9.13).unwrap();
        let amenities = client.fetch_amenities(&bbox, &[]).await.unwrap();
        assert!(amenities.is_empty());
    }
}
