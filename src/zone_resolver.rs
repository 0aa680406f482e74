//! Zone resolution and crime composition
//!
//! Reverse-geocodes a point into a zone, then asks the crime provider about
//! that zone. The second call needs the first one's answer, so the two run in
//! sequence and are exposed as one unit.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::Result;
use crate::models::{CrimeRecord, ZoneIdentifier};
use crate::providers::{CrimeProvider, ZoneProvider};

/// Service for resolving points into zones and zones into crime statistics
#[derive(Clone)]
pub struct ZoneResolver {
    zones: Arc<dyn ZoneProvider>,
    crimes: Arc<dyn CrimeProvider>,
}

impl ZoneResolver {
    pub fn new(zones: Arc<dyn ZoneProvider>, crimes: Arc<dyn CrimeProvider>) -> Self {
        Self { zones, crimes }
    }

    pub async fn resolve_zone(&self, lat: f64, lon: f64) -> Result<ZoneIdentifier> {
        debug!("Resolving zone for ({}, {})", lat, lon);
        let zone = self.zones.fetch_zone(lat, lon).await?;
        debug!("Resolved zone names: {:?}", zone.names().collect::<Vec<_>>());
        Ok(zone)
    }

    /// Crime statistics for the zone containing the point
    pub async fn crimes_at(&self, lat: f64, lon: f64) -> Result<Vec<CrimeRecord>> {
        let zone = self.resolve_zone(lat, lon).await?;
        let zones = BTreeSet::from([zone]);
        self.crimes.fetch_crimes(&zones).await
    }
}
