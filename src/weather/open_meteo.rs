//! `OpenMeteo` historical archive client

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, instrument};

use super::{HourlySample, summarize_seasons};
use crate::Result;
use crate::error::ApiError;
use crate::http::read_json;
use crate::models::SeasonalWeather;
use crate::providers::WindProvider;

/// Archive response from `OpenMeteo`
#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    pub hourly: Option<HourlyData>,
}

/// Hourly series from `OpenMeteo`, values may be null
#[derive(Debug, Deserialize)]
pub struct HourlyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m", default)]
    pub temperature: Vec<Option<f64>>,
    #[serde(rename = "wind_speed_10m", default)]
    pub wind_speed: Vec<Option<f64>>,
}

impl HourlyData {
    pub fn samples(&self) -> Result<Vec<HourlySample>> {
        self.time
            .iter()
            .enumerate()
            .map(|(i, raw)| {
                let time = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").map_err(|_| {
                    ApiError::response(format!("invalid timestamp in weather history: {raw}"))
                })?;
                Ok(HourlySample {
                    time,
                    temperature: self.temperature.get(i).copied().flatten(),
                    wind_speed: self.wind_speed.get(i).copied().flatten(),
                })
            })
            .collect()
    }
}

/// `OpenMeteo` API client
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl OpenMeteoClient {
    pub fn new(http: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Fetch and summarize one full calendar year of hourly history
    #[instrument(skip(self))]
    pub async fn seasonal_history(&self, lat: f64, lon: f64, year: i32) -> Result<Vec<SeasonalWeather>> {
        let start_date = format!("{year}-01-01");
        let end_date = format!("{year}-12-31");
        let response = self
            .http
            .get(format!("{}/archive", self.base_url))
            .timeout(self.timeout)
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("start_date", start_date),
                ("end_date", end_date),
                ("hourly", "temperature_2m,wind_speed_10m".to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let archive: ArchiveResponse = read_json("OpenMeteo archive", response).await?;
        let samples = match archive.hourly {
            Some(hourly) => hourly.samples()?,
            None => Vec::new(),
        };
        let seasons = summarize_seasons(&samples)?;
        info!(
            "Summarized {} hourly samples into {} seasons",
            samples.len(),
            seasons.len()
        );
        Ok(seasons)
    }
}

#[async_trait]
impl WindProvider for OpenMeteoClient {
    async fn fetch_wind(&self, lat: f64, lon: f64) -> Result<Vec<SeasonalWeather>> {
        // last complete year
        let year = Utc::now().year() - 1;
        self.seasonal_history(lat, lon, year).await
    }
}
