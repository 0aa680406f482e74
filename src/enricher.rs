//! Location enrichment orchestrator
//!
//! Fans out four independent branches (places, traffic, weather and the
//! zone→crime chain), each under its own budget, and merges them into one
//! [`LocationEnrichment`]. Success is all-or-nothing: the first failing branch
//! cancels its siblings and the caller gets a single classified error.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::error::ApiError;
use crate::models::place::parking_spaces;
use crate::models::{CrimeRecord, GeoPoint, LocationEnrichment, Place, SeasonalWeather};
use crate::providers::{PlacesProvider, TrafficProvider, WindProvider};
use crate::scope::{Outcome, run_guarded};
use crate::traffic;
use crate::zone_resolver::ZoneResolver;

/// Per-branch budgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchTimeouts {
    pub places: Duration,
    pub traffic: Duration,
    pub weather: Duration,
    pub crime: Duration,
}

impl BranchTimeouts {
    pub fn uniform(budget: Duration) -> Self {
        Self {
            places: budget,
            traffic: budget,
            weather: budget,
            crime: budget,
        }
    }

    /// Upper bound on how long an enrichment can take
    pub fn max(&self) -> Duration {
        self.places
            .max(self.traffic)
            .max(self.weather)
            .max(self.crime)
    }
}

impl Default for BranchTimeouts {
    fn default() -> Self {
        Self::uniform(Duration::from_secs(10))
    }
}

enum Branch {
    Places(Vec<Place>),
    Traffic(String),
    Wind(Vec<SeasonalWeather>),
    Crimes(Vec<CrimeRecord>),
}

/// Aggregates all providers for a point
#[derive(Clone)]
pub struct LocationEnricher {
    places: Arc<dyn PlacesProvider>,
    traffic: Arc<dyn TrafficProvider>,
    wind: Arc<dyn WindProvider>,
    zones: ZoneResolver,
    timeouts: BranchTimeouts,
}

impl LocationEnricher {
    pub fn new(
        places: Arc<dyn PlacesProvider>,
        traffic: Arc<dyn TrafficProvider>,
        wind: Arc<dyn WindProvider>,
        zones: ZoneResolver,
        timeouts: BranchTimeouts,
    ) -> Self {
        Self {
            places,
            traffic,
            wind,
            zones,
            timeouts,
        }
    }

    pub fn timeouts(&self) -> BranchTimeouts {
        self.timeouts
    }

    /// Enrich a point with everything the providers know about its surroundings
    pub async fn enrich(&self, lat: f64, lon: f64, radius_m: f64) -> Result<LocationEnrichment> {
        self.enrich_within(lat, lon, radius_m, &CancellationToken::new())
            .await
    }

    /// Like [`enrich`](Self::enrich), bound to a caller-owned request scope.
    ///
    /// Cancelling `scope` aborts every branch and yields a timeout error.
    #[instrument(skip(self, scope))]
    pub async fn enrich_within(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
        scope: &CancellationToken,
    ) -> Result<LocationEnrichment> {
        GeoPoint::new(lat, lon)?;
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(ApiError::request(format!("invalid radius {radius_m}")));
        }
        info!("Enriching ({}, {}) within {}m", lat, lon, radius_m);

        let branches = scope.child_token();
        let mut tasks = self.spawn_branches(lat, lon, radius_m, &branches);

        let mut places = None;
        let mut traffic_level = None;
        let mut wind = None;
        let mut crimes = None;
        let mut failures = Vec::new();

        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.unwrap_or_else(|e| Outcome::Failed(ApiError::from(e)));
            match outcome {
                Outcome::Completed(Branch::Places(value)) => places = Some(value),
                Outcome::Completed(Branch::Traffic(value)) => traffic_level = Some(value),
                Outcome::Completed(Branch::Wind(value)) => wind = Some(value),
                Outcome::Completed(Branch::Crimes(value)) => crimes = Some(value),
                Outcome::Failed(err) => {
                    if failures.is_empty() {
                        debug!("First branch failure, cancelling siblings");
                        branches.cancel();
                    }
                    failures.push(err);
                }
                Outcome::Aborted => {}
            }
        }

        if scope.is_cancelled() {
            warn!("Enrichment scope cancelled by caller");
            return Err(ApiError::timeout("enrichment request was cancelled"));
        }
        if let Some(err) = ApiError::most_severe(failures) {
            warn!("Enrichment failed: {}", err);
            return Err(err);
        }

        match (places, traffic_level, wind, crimes) {
            (Some(places), Some(traffic_level), Some(wind), Some(crimes)) => {
                let parking_spaces = parking_spaces(&places);
                info!(
                    "Enriched ({}, {}): {} places, {} parking, traffic {}",
                    lat,
                    lon,
                    places.len(),
                    parking_spaces.len(),
                    traffic_level
                );
                Ok(LocationEnrichment {
                    lat,
                    lon,
                    radius: radius_m,
                    places,
                    parking_spaces,
                    traffic_level,
                    wind,
                    crimes,
                })
            }
            _ => Err(ApiError::internal("enrichment branch ended without a result")),
        }
    }

    fn spawn_branches(
        &self,
        lat: f64,
        lon: f64,
        radius_m: f64,
        token: &CancellationToken,
    ) -> JoinSet<Outcome<Branch>> {
        let mut tasks = JoinSet::new();

        let places = Arc::clone(&self.places);
        let budget = self.timeouts.places;
        let branch_token = token.clone();
        tasks.spawn(async move {
            run_guarded("places", budget, &branch_token, async {
                places
                    .fetch_places(lat, lon, radius_m)
                    .await
                    .map(Branch::Places)
            })
            .await
        });

        let ways_provider = Arc::clone(&self.traffic);
        let budget = self.timeouts.traffic;
        let branch_token = token.clone();
        tasks.spawn(async move {
            run_guarded("traffic", budget, &branch_token, async {
                let ways = ways_provider.fetch_traffic(lat, lon, radius_m).await?;
                Ok(Branch::Traffic(traffic::classify(&ways)))
            })
            .await
        });

        let wind = Arc::clone(&self.wind);
        let budget = self.timeouts.weather;
        let branch_token = token.clone();
        tasks.spawn(async move {
            run_guarded("weather", budget, &branch_token, async {
                wind.fetch_wind(lat, lon).await.map(Branch::Wind)
            })
            .await
        });

        let zones = self.zones.clone();
        let budget = self.timeouts.crime;
        let branch_token = token.clone();
        tasks.spawn(async move {
            run_guarded("zone-crime", budget, &branch_token, async {
                zones.crimes_at(lat, lon).await.map(Branch::Crimes)
            })
            .await
        });

        tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_timeouts_max() {
        let timeouts = BranchTimeouts {
            places: Duration::from_secs(3),
            traffic: Duration::from_secs(12),
            weather: Duration::from_secs(5),
            crime: Duration::from_secs(10),
        };
        assert_eq!(timeouts.max(), Duration::from_secs(12));
        assert_eq!(BranchTimeouts::default().max(), Duration::from_secs(10));
    }
}
