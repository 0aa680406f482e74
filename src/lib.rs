//! `GeoEnrich` - Location enrichment from open geodata providers
//!
//! This library aggregates OpenStreetMap places and traffic, reverse
//! geocoding, historical weather, crime statistics and housing prices
//! for a point or an administrative area.

pub mod amenities;
pub mod api;
pub mod config;
pub mod crime;
pub mod enricher;
pub mod error;
pub mod geocoding;
pub mod housing;
pub mod http;
pub mod logging;
pub mod models;
pub mod overpass;
pub mod providers;
pub mod scope;
pub mod traffic;
pub mod weather;
pub mod web;
pub mod zone_resolver;

// Re-export core types for public API
pub use amenities::{AmenitiesPipeline, AmenitiesTimeouts};
pub use config::GeoEnrichConfig;
pub use crime::CrimeStatsClient;
pub use enricher::{BranchTimeouts, LocationEnricher};
pub use error::{ApiError, ErrorKind};
pub use geocoding::NominatimClient;
pub use housing::{AreaDirectory, HousingClient, HousingPriceResolver};
pub use models::{AmenitiesResult, BoundingBox, GeoPoint, LocationEnrichment};
pub use overpass::{AmenityCatalogue, OverpassClient};
pub use weather::OpenMeteoClient;
pub use zone_resolver::ZoneResolver;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, ApiError>;
