//! OpenStreetMap-derived places, traffic ways and amenities

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::GeoPoint;

/// `amenity` tag values that mark a place as a parking space
pub const PARKING_AMENITIES: [&str; 3] = ["parking", "motorcycle_parking", "parking_entrance"];

/// A tagged OpenStreetMap element near the requested point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// OSM element type (`node`, `way`, ...)
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl Place {
    #[must_use]
    pub fn is_parking_space(&self) -> bool {
        self.tags
            .get("amenity")
            .is_some_and(|value| PARKING_AMENITIES.contains(&value.as_str()))
    }
}

/// Parking spaces are a view over places, never fetched separately
#[must_use]
pub fn parking_spaces(places: &[Place]) -> Vec<Place> {
    places
        .iter()
        .filter(|place| place.is_parking_space())
        .cloned()
        .collect()
}

/// A raw `highway` way returned by the traffic query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficWay {
    pub id: i64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl TrafficWay {
    #[must_use]
    pub fn highway(&self) -> Option<&str> {
        self.tags.get("highway").map(String::as_str)
    }
}

/// A point of interest found inside a bounding box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Outcome of the amenities pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmenitiesResult {
    pub center: GeoPoint,
    pub amenities: Vec<Amenity>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn place(id: i64, amenity: Option<&str>) -> Place {
        let mut tags = HashMap::new();
        if let Some(value) = amenity {
            tags.insert("amenity".to_string(), value.to_string());
        }
        Place {
            kind: "node".to_string(),
            id,
            lat: 38.7,
            lon: -9.1,
            tags,
        }
    }

    #[rstest]
    #[case(Some("parking"), true)]
    #[case(Some("motorcycle_parking"), true)]
    #[case(Some("parking_entrance"), true)]
    #[case(Some("bicycle_parking"), false)]
    #[case(Some("cafe"), false)]
    #[case(None, false)]
    fn test_parking_classification(#[case] amenity: Option<&str>, #[case] expected: bool) {
        assert_eq!(place(1, amenity).is_parking_space(), expected);
    }

    #[test]
    fn test_parking_spaces_is_subset_in_order() {
        let places = vec![
            place(1, Some("cafe")),
            place(2, Some("parking")),
            place(3, None),
            place(4, Some("parking_entrance")),
        ];
        let parking = parking_spaces(&places);
        let ids: Vec<i64> = parking.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 4]);
        assert!(parking.iter().all(|p| places.contains(p)));
    }

    #[test]
    fn test_place_serializes_type_field() {
        let json = serde_json::to_value(place(7, Some("parking"))).unwrap();
        assert_eq!(json["type"], "node");
        assert_eq!(json["tags"]["amenity"], "parking");
    }
}
