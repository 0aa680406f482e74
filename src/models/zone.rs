//! Reverse-geocoded zones and crime statistics

use serde::{Deserialize, Serialize};

/// Administrative breakdown of a point, used as a composite key by the crime provider
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ZoneIdentifier {
    pub hamlet: Option<String>,
    pub village: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub road: Option<String>,
}

impl ZoneIdentifier {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names().next().is_none()
    }

    /// Populated names, most specific first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [
            &self.road,
            &self.hamlet,
            &self.village,
            &self.suburb,
            &self.town,
            &self.city,
            &self.municipality,
            &self.county,
        ]
        .into_iter()
        .filter_map(|name| name.as_deref())
        .filter(|name| !name.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrimeRecord {
    pub zone: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_zone() {
        assert!(ZoneIdentifier::default().is_empty());
        let blank = ZoneIdentifier {
            city: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.is_empty());
    }

    #[test]
    fn test_names_most_specific_first() {
        let zone = ZoneIdentifier {
            suburb: Some("Avenidas Novas".to_string()),
            city: Some("Lisboa".to_string()),
            county: Some("Lisboa".to_string()),
            ..Default::default()
        };
        let names: Vec<&str> = zone.names().collect();
        assert_eq!(names, vec!["Avenidas Novas", "Lisboa", "Lisboa"]);
    }
}
