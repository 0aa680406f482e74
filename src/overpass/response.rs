//! Overpass JSON response parsing

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::Result;
use crate::error::ApiError;
use crate::models::{Amenity, Place, TrafficWay};

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type", default)]
    pub kind: String,
    pub id: Option<i64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    fn is_anonymous(&self) -> bool {
        self.id.is_none() && self.tags.is_empty()
    }

    /// Own coordinates, or the computed center for ways
    fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lon, &self.center) {
            (Some(lat), Some(lon), _) => Some((lat, lon)),
            (_, _, Some(center)) => Some((center.lat, center.lon)),
            _ => None,
        }
    }
}

/// Decode the body and surface server-side failures reported inside a 200 answer.
pub fn parse_response(body: &str) -> Result<OverpassResponse> {
    let response: OverpassResponse = serde_json::from_str(body)?;
    if let Some(remark) = &response.remark {
        if remark.contains("runtime error") {
            return Err(ApiError::response(format!("Overpass reported: {remark}")));
        }
    }
    Ok(response)
}

/// Convert elements into places, keeping provider order
pub fn to_places(response: OverpassResponse) -> Vec<Place> {
    response
        .elements
        .into_iter()
        .filter(|element| !element.is_anonymous())
        .filter_map(|element| {
            let Some((lat, lon)) = element.position() else {
                debug!("Skipping element {:?} without coordinates", element.id);
                return None;
            };
            Some(Place {
                kind: element.kind,
                id: element.id.unwrap_or_default(),
                lat,
                lon,
                tags: element.tags,
            })
        })
        .collect()
}

pub fn to_traffic_ways(response: OverpassResponse) -> Vec<TrafficWay> {
    response
        .elements
        .into_iter()
        .filter(|element| !element.is_anonymous())
        .map(|element| TrafficWay {
            id: element.id.unwrap_or_default(),
            tags: element.tags,
        })
        .collect()
}

pub fn to_amenities(response: OverpassResponse) -> Vec<Amenity> {
    response
        .elements
        .into_iter()
        .filter(|element| !element.is_anonymous())
        .filter_map(|element| {
            let (lat, lon) = element.position()?;
            Some(Amenity {
                id: element.id.map(|id| id.to_string()).unwrap_or_default(),
                lat,
                lon,
                tags: element.tags,
            })
        })
        .collect()
}
