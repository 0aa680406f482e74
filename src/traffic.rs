//! Traffic level classification
//!
//! Reduces the raw `highway` ways around a point to one qualitative label.

use crate::models::TrafficWay;

#[must_use]
pub fn highway_weight(highway: Option<&str>) -> u32 {
    match highway {
        Some("motorway" | "motorway_link" | "trunk" | "trunk_link") => 5,
        Some("primary" | "primary_link") => 4,
        Some("secondary" | "secondary_link") => 3,
        Some("tertiary" | "tertiary_link") => 2,
        _ => 1,
    }
}

/// Deterministic label for a set of ways: `low`, `moderate`, `high` or `very high`
#[must_use]
pub fn classify(ways: &[TrafficWay]) -> String {
    let score: u32 = ways.iter().map(|way| highway_weight(way.highway())).sum();
    let label = match score {
        0..15 => "low",
        15..40 => "moderate",
        40..80 => "high",
        _ => "very high",
    };
    label.to_string()
}
