//! Geographic primitives

use haversine::{Location as HaversineLocation, Units, distance};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Mean Earth radius used by the haversine approximation, in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
}

impl GeoPoint {
    /// Create a validated point
    pub fn new(lat: f64, lon: f64) -> Result<Self, ApiError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ApiError::request(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ApiError::request(format!(
                "longitude {lon} outside [-180, 180]"
            )));
        }
        Ok(Self { lat, lon })
    }

    /// Great-circle distance in meters
    #[must_use]
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let from = HaversineLocation {
            latitude: self.lat,
            longitude: self.lon,
        };
        let to = HaversineLocation {
            latitude: other.lat,
            longitude: other.lon,
        };
        // the crate's kilometre radius is 6371, so this is EARTH_RADIUS_M based
        distance(from, to, Units::Kilometers) * 1000.0
    }

    #[must_use]
    pub fn within_radius(&self, other: &GeoPoint, radius_m: f64) -> bool {
        self.distance_to(other) <= radius_m
    }
}

/// Axis-aligned latitude/longitude rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a bounding box, rejecting inverted edges
    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Result<Self, ApiError> {
        if min_lat > max_lat || min_lon > max_lon {
            return Err(ApiError::response(format!(
                "inverted bounding box [{min_lat}, {max_lat}, {min_lon}, {max_lon}]"
            )));
        }
        Ok(Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    /// Arithmetic midpoint of the box
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.min_lat + self.max_lat) / 2.0,
            lon: (self.min_lon + self.max_lon) / 2.0,
        }
    }

    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }
}
