//! Seasonal weather summaries

use serde::{Deserialize, Serialize};

/// Meteorological season
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Season for a calendar month (1-12), northern hemisphere meteorological split
    #[must_use]
    pub fn from_month(month: u32) -> Option<Season> {
        match month {
            3..=5 => Some(Season::Spring),
            6..=8 => Some(Season::Summer),
            9..=11 => Some(Season::Autumn),
            12 | 1 | 2 => Some(Season::Winter),
            _ => None,
        }
    }
}

/// Averaged conditions for one part of the day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReading {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Wind speed in km/h
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalWeather {
    pub season: Season,
    pub morning: PeriodReading,
    pub afternoon: PeriodReading,
    pub night: PeriodReading,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_month_has_a_season() {
        for month in 1..=12 {
            assert!(Season::from_month(month).is_some(), "month {month}");
        }
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
        assert_eq!(Season::from_month(12), Some(Season::Winter));
        assert_eq!(Season::from_month(3), Some(Season::Spring));
    }

    #[test]
    fn test_season_serializes_lowercase() {
        let json = serde_json::to_string(&Season::Autumn).unwrap();
        assert_eq!(json, "\"autumn\"");
    }
}
