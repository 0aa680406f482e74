//! Data models for the enrichment core
//!
//! This module contains the domain value objects organized by concern:
//! - Geo: points, bounding boxes and distance math
//! - Place: OpenStreetMap places, traffic ways and amenities
//! - Weather: seasonal weather summaries
//! - Zone: reverse-geocoded zones and crime records
//! - Enrichment: the aggregate returned to callers

pub mod enrichment;
pub mod geo;
pub mod place;
pub mod weather;
pub mod zone;

// Re-export all public types for convenient access
pub use enrichment::LocationEnrichment;
pub use geo::{BoundingBox, GeoPoint};
pub use place::{AmenitiesResult, Amenity, Place, TrafficWay};
pub use weather::{PeriodReading, Season, SeasonalWeather};
pub use zone::{CrimeRecord, ZoneIdentifier};
