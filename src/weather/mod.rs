//! Weather-by-season
//!
//! Hourly history is bucketed by meteorological season and part of the day,
//! then averaged into one [`SeasonalWeather`] per season.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::Result;
use crate::error::ApiError;
use crate::models::{PeriodReading, Season, SeasonalWeather};

pub mod open_meteo;

pub use open_meteo::OpenMeteoClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Night,
}

impl DayPeriod {
    pub const ALL: [DayPeriod; 3] = [DayPeriod::Morning, DayPeriod::Afternoon, DayPeriod::Night];

    #[must_use]
    pub fn from_hour(hour: u32) -> DayPeriod {
        match hour {
            6..=11 => DayPeriod::Morning,
            12..=17 => DayPeriod::Afternoon,
            _ => DayPeriod::Night,
        }
    }
}

/// One hourly observation
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySample {
    pub time: NaiveDateTime,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    temperature_sum: f64,
    temperature_count: u32,
    wind_sum: f64,
    wind_count: u32,
}

impl Accumulator {
    fn add(&mut self, sample: &HourlySample) {
        if let Some(t) = sample.temperature {
            self.temperature_sum += t;
            self.temperature_count += 1;
        }
        if let Some(w) = sample.wind_speed {
            self.wind_sum += w;
            self.wind_count += 1;
        }
    }

    fn reading(&self) -> Option<PeriodReading> {
        if self.temperature_count == 0 || self.wind_count == 0 {
            return None;
        }
        Some(PeriodReading {
            temperature: round1(self.temperature_sum / f64::from(self.temperature_count)),
            wind_speed: round1(self.wind_sum / f64::from(self.wind_count)),
        })
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Average samples into exactly one entry per season.
///
/// No samples at all is an empty answer, not an error. A history that leaves
/// any season or part of the day without readings is rejected.
pub fn summarize_seasons(samples: &[HourlySample]) -> Result<Vec<SeasonalWeather>> {
    if samples.is_empty() {
        return Ok(Vec::new());
    }

    let mut buckets: BTreeMap<(Season, DayPeriod), Accumulator> = BTreeMap::new();
    for sample in samples {
        let Some(season) = Season::from_month(sample.time.month()) else {
            continue;
        };
        let period = DayPeriod::from_hour(sample.time.hour());
        buckets.entry((season, period)).or_default().add(sample);
    }

    Season::ALL
        .iter()
        .map(|&season| {
            let reading = |period: DayPeriod| {
                buckets
                    .get(&(season, period))
                    .and_then(Accumulator::reading)
                    .ok_or_else(|| {
                        ApiError::response(format!(
                            "weather history has no {period:?} readings for {season:?}"
                        ))
                    })
            };
            Ok(SeasonalWeather {
                season,
                morning: reading(DayPeriod::Morning)?,
                afternoon: reading(DayPeriod::Afternoon)?,
                night: reading(DayPeriod::Night)?,
            })
        })
        .collect()
}
