//! # Overpass API integration
//!
//! Queries OpenStreetMap data through the Overpass API.
//!
//! - `query`: pure query synthesis for radius and bounding-box searches
//! - `catalogue`: the amenity type name to tag dictionary
//! - `response`: parsing of the element list into domain values
//! - `client`: the HTTP client implementing the provider traits

pub mod catalogue;
pub mod client;
pub mod query;
pub mod response;

pub use catalogue::AmenityCatalogue;
pub use client::OverpassClient;
pub use query::{ElementKind, TagFilter, bbox_query, radius_query};
