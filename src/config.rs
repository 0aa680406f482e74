//! Configuration management for the enrichment service
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::amenities::AmenitiesTimeouts;
use crate::enricher::BranchTimeouts;
use crate::overpass::{AmenityCatalogue, TagFilter};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoEnrichConfig {
    /// Upstream provider endpoints
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Per-branch and per-stage budgets
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    /// Amenity type overrides (type name → tag filter)
    #[serde(default)]
    pub catalogue: HashMap<String, TagFilter>,
    /// Static reference data
    #[serde(default)]
    pub reference: ReferenceConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Provider endpoints and HTTP identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,
    #[serde(default = "default_nominatim_url")]
    pub nominatim_url: String,
    #[serde(default = "default_weather_url")]
    pub weather_url: String,
    #[serde(default = "default_crime_url")]
    pub crime_url: String,
    #[serde(default = "default_housing_url")]
    pub housing_url: String,
    /// Sent on every request; Nominatim rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Appended to forward geocoding queries
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,
}

/// Budgets in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_branch_timeout")]
    pub places_ms: u64,
    #[serde(default = "default_branch_timeout")]
    pub traffic_ms: u64,
    #[serde(default = "default_branch_timeout")]
    pub weather_ms: u64,
    #[serde(default = "default_branch_timeout")]
    pub crime_ms: u64,
    #[serde(default = "default_geocoding_timeout")]
    pub geocoding_ms: u64,
    #[serde(default = "default_branch_timeout")]
    pub amenities_ms: u64,
    #[serde(default = "default_branch_timeout")]
    pub housing_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceConfig {
    /// JSON table of district → council → area id
    pub areas_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_overpass_url() -> String {
    "https://overpass-api.de/api".to_string()
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_weather_url() -> String {
    "https://archive-api.open-meteo.com/v1".to_string()
}

fn default_crime_url() -> String {
    "http://localhost:8081/api".to_string()
}

fn default_housing_url() -> String {
    "http://localhost:8082/api".to_string()
}

fn default_user_agent() -> String {
    format!("geoenrich/{}", env!("CARGO_PKG_VERSION"))
}

fn default_country() -> String {
    "Portugal".to_string()
}

fn default_connect_timeout() -> u64 {
    5_000
}

fn default_branch_timeout() -> u64 {
    10_000
}

fn default_geocoding_timeout() -> u64 {
    20_000
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            overpass_url: default_overpass_url(),
            nominatim_url: default_nominatim_url(),
            weather_url: default_weather_url(),
            crime_url: default_crime_url(),
            housing_url: default_housing_url(),
            user_agent: default_user_agent(),
            country: default_country(),
            connect_timeout_ms: default_connect_timeout(),
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            places_ms: default_branch_timeout(),
            traffic_ms: default_branch_timeout(),
            weather_ms: default_branch_timeout(),
            crime_ms: default_branch_timeout(),
            geocoding_ms: default_geocoding_timeout(),
            amenities_ms: default_branch_timeout(),
            housing_ms: default_branch_timeout(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn fill(value: &mut String, default: fn() -> String) {
    if value.trim().is_empty() {
        *value = default();
    }
}

impl TimeoutConfig {
    const MAX_MS: u64 = 300_000;

    fn entries(&self) -> [(&'static str, u64); 7] {
        [
            ("places", self.places_ms),
            ("traffic", self.traffic_ms),
            ("weather", self.weather_ms),
            ("crime", self.crime_ms),
            ("geocoding", self.geocoding_ms),
            ("amenities", self.amenities_ms),
            ("housing", self.housing_ms),
        ]
    }

    #[must_use]
    pub fn branch_timeouts(&self) -> BranchTimeouts {
        BranchTimeouts {
            places: Duration::from_millis(self.places_ms),
            traffic: Duration::from_millis(self.traffic_ms),
            weather: Duration::from_millis(self.weather_ms),
            crime: Duration::from_millis(self.crime_ms),
        }
    }

    #[must_use]
    pub fn amenities_timeouts(&self) -> AmenitiesTimeouts {
        AmenitiesTimeouts {
            geocoding: Duration::from_millis(self.geocoding_ms),
            amenities: Duration::from_millis(self.amenities_ms),
        }
    }

    #[must_use]
    pub fn housing(&self) -> Duration {
        Duration::from_millis(self.housing_ms)
    }
}

impl GeoEnrichConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. GEOENRICH_TIMEOUTS__PLACES_MS=5000
        builder = builder.add_source(
            Environment::with_prefix("GEOENRICH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GeoEnrichConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("geoenrich").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        let providers = &mut self.providers;
        fill(&mut providers.overpass_url, default_overpass_url);
        fill(&mut providers.nominatim_url, default_nominatim_url);
        fill(&mut providers.weather_url, default_weather_url);
        fill(&mut providers.crime_url, default_crime_url);
        fill(&mut providers.housing_url, default_housing_url);
        fill(&mut providers.user_agent, default_user_agent);
        fill(&mut self.logging.level, default_log_level);
        fill(&mut self.logging.format, default_log_format);
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_timeouts()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        let providers = &self.providers;
        for (name, url) in [
            ("overpass", &providers.overpass_url),
            ("nominatim", &providers.nominatim_url),
            ("weather", &providers.weather_url),
            ("crime", &providers.crime_url),
            ("housing", &providers.housing_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("Provider '{name}' base URL must be a valid HTTP or HTTPS URL, got '{url}'");
            }
        }
        Ok(())
    }

    fn validate_timeouts(&self) -> Result<()> {
        for (name, ms) in self.timeouts.entries() {
            if ms == 0 {
                bail!("Timeout '{name}' must be greater than zero");
            }
            if ms > TimeoutConfig::MAX_MS {
                bail!(
                    "Timeout '{name}' cannot exceed {} ms",
                    TimeoutConfig::MAX_MS
                );
            }
        }
        if self.providers.connect_timeout_ms == 0 {
            bail!("Connect timeout must be greater than zero");
        }
        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            bail!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            );
        }
        Ok(())
    }

    /// Built-in catalogue, or the configured override table
    #[must_use]
    pub fn amenity_catalogue(&self) -> AmenityCatalogue {
        if self.catalogue.is_empty() {
            AmenityCatalogue::default()
        } else {
            AmenityCatalogue::from_entries(self.catalogue.clone())
        }
    }
}
