//! Seams between the pipelines and the upstream geodata providers
//!
//! One trait per data kind. Implementations never return an error for an
//! empty answer: "no data" is `Ok(vec![])` and "location not found" is
//! `Ok(None)`.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::Result;
use crate::models::{
    Amenity, BoundingBox, CrimeRecord, Place, SeasonalWeather, TrafficWay, ZoneIdentifier,
};
use crate::overpass::TagFilter;

#[async_trait]
pub trait PlacesProvider: Send + Sync {
    async fn fetch_places(&self, lat: f64, lon: f64, radius_m: f64) -> Result<Vec<Place>>;
}

#[async_trait]
pub trait TrafficProvider: Send + Sync {
    async fn fetch_traffic(&self, lat: f64, lon: f64, radius_m: f64) -> Result<Vec<TrafficWay>>;
}

#[async_trait]
pub trait WindProvider: Send + Sync {
    /// One entry per season, or none when the provider has no history
    async fn fetch_wind(&self, lat: f64, lon: f64) -> Result<Vec<SeasonalWeather>>;
}

#[async_trait]
pub trait ZoneProvider: Send + Sync {
    async fn fetch_zone(&self, lat: f64, lon: f64) -> Result<ZoneIdentifier>;
}

#[async_trait]
pub trait CrimeProvider: Send + Sync {
    async fn fetch_crimes(&self, zones: &BTreeSet<ZoneIdentifier>) -> Result<Vec<CrimeRecord>>;
}

#[async_trait]
pub trait BoundingBoxProvider: Send + Sync {
    async fn fetch_bounding_box(
        &self,
        parish: &str,
        municipality: &str,
        district: &str,
    ) -> Result<Option<BoundingBox>>;
}

#[async_trait]
pub trait AmenitiesProvider: Send + Sync {
    /// `filters` is never empty when called from the amenities pipeline
    async fn fetch_amenities(&self, bbox: &BoundingBox, filters: &[TagFilter])
    -> Result<Vec<Amenity>>;
}

#[async_trait]
pub trait HousingPriceProvider: Send + Sync {
    async fn fetch_council_price(&self, area_id: u32) -> Result<i64>;
    async fn fetch_district_price(&self, district: &str) -> Result<i64>;
}
