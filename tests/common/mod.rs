//! Stub providers shared by the integration tests
#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use geoenrich::Result;
use geoenrich::error::ApiError;
use geoenrich::models::{
    Amenity, BoundingBox, CrimeRecord, PeriodReading, Place, Season, SeasonalWeather, TrafficWay,
    ZoneIdentifier,
};
use geoenrich::overpass::TagFilter;
use geoenrich::providers::{
    AmenitiesProvider, BoundingBoxProvider, CrimeProvider, PlacesProvider, TrafficProvider,
    WindProvider, ZoneProvider,
};
use geoenrich::{BranchTimeouts, LocationEnricher, ZoneResolver};

/// Canned provider answer with call recording.
///
/// `abandoned` is set when a call's future is dropped before it finished.
pub struct Stub<T> {
    result: Result<T>,
    delay: Duration,
    pub calls: AtomicUsize,
    pub abandoned: AtomicBool,
    pub seen: Mutex<Vec<String>>,
}

struct Probe<'a> {
    flag: &'a AtomicBool,
    armed: bool,
}

impl Drop for Probe<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.flag.store(true, Ordering::SeqCst);
        }
    }
}

impl<T: Clone + Send + Sync> Stub<T> {
    pub fn ok(value: T) -> Self {
        Self::with_result(Ok(value))
    }

    pub fn failing(err: ApiError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(result: Result<T>) -> Self {
        Self {
            result,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            abandoned: AtomicBool::new(false),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Answer only after `delay`
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn was_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }

    async fn answer(&self, request: String) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request);
        let mut probe = Probe {
            flag: &self.abandoned,
            armed: true,
        };
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        probe.armed = false;
        self.result.clone()
    }
}

#[async_trait]
impl PlacesProvider for Stub<Vec<Place>> {
    async fn fetch_places(&self, lat: f64, lon: f64, radius_m: f64) -> Result<Vec<Place>> {
        self.answer(format!("{lat},{lon},{radius_m}")).await
    }
}

#[async_trait]
impl TrafficProvider for Stub<Vec<TrafficWay>> {
    async fn fetch_traffic(&self, lat: f64, lon: f64, radius_m: f64) -> Result<Vec<TrafficWay>> {
        self.answer(format!("{lat},{lon},{radius_m}")).await
    }
}

#[async_trait]
impl WindProvider for Stub<Vec<SeasonalWeather>> {
    async fn fetch_wind(&self, lat: f64, lon: f64) -> Result<Vec<SeasonalWeather>> {
        self.answer(format!("{lat},{lon}")).await
    }
}

#[async_trait]
impl ZoneProvider for Stub<ZoneIdentifier> {
    async fn fetch_zone(&self, lat: f64, lon: f64) -> Result<ZoneIdentifier> {
        self.answer(format!("{lat},{lon}")).await
    }
}

#[async_trait]
impl CrimeProvider for Stub<Vec<CrimeRecord>> {
    async fn fetch_crimes(&self, zones: &BTreeSet<ZoneIdentifier>) -> Result<Vec<CrimeRecord>> {
        let names: Vec<&str> = zones.iter().flat_map(|zone| zone.names()).collect();
        self.answer(names.join("|")).await
    }
}

#[async_trait]
impl BoundingBoxProvider for Stub<Option<BoundingBox>> {
    async fn fetch_bounding_box(
        &self,
        parish: &str,
        municipality: &str,
        district: &str,
    ) -> Result<Option<BoundingBox>> {
        self.answer(format!("{parish}, {municipality}, {district}"))
            .await
    }
}

#[async_trait]
impl AmenitiesProvider for Stub<Vec<Amenity>> {
    async fn fetch_amenities(
        &self,
        bbox: &BoundingBox,
        filters: &[TagFilter],
    ) -> Result<Vec<Amenity>> {
        let filters: Vec<String> = filters.iter().map(ToString::to_string).collect();
        self.answer(format!(
            "{}({},{},{},{})",
            filters.join(""),
            bbox.min_lat,
            bbox.min_lon,
            bbox.max_lat,
            bbox.max_lon
        ))
        .await
    }
}

pub fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn place(id: i64, pairs: &[(&str, &str)]) -> Place {
    Place {
        kind: "node".to_string(),
        id,
        lat: 38.7369,
        lon: -9.1427,
        tags: tags(pairs),
    }
}

pub fn sample_places() -> Vec<Place> {
    vec![
        place(1, &[("amenity", "cafe"), ("name", "Café Império")]),
        place(2, &[("amenity", "parking")]),
        place(3, &[("shop", "bakery")]),
        place(4, &[("amenity", "motorcycle_parking")]),
        place(5, &[("amenity", "bicycle_parking")]),
    ]
}

pub fn sample_ways() -> Vec<TrafficWay> {
    vec![
        TrafficWay {
            id: 10,
            tags: tags(&[("highway", "primary")]),
        },
        TrafficWay {
            id: 11,
            tags: tags(&[("highway", "residential")]),
        },
    ]
}

pub fn four_seasons() -> Vec<SeasonalWeather> {
    Season::ALL
        .iter()
        .map(|season| SeasonalWeather {
            season: *season,
            morning: PeriodReading {
                temperature: 14.0,
                wind_speed: 9.5,
            },
            afternoon: PeriodReading {
                temperature: 19.2,
                wind_speed: 14.1,
            },
            night: PeriodReading {
                temperature: 11.7,
                wind_speed: 7.3,
            },
        })
        .collect()
}

pub fn lisboa_zone() -> ZoneIdentifier {
    ZoneIdentifier {
        suburb: Some("Avenidas Novas".to_string()),
        city: Some("Lisboa".to_string()),
        ..Default::default()
    }
}

pub fn sample_crimes() -> Vec<CrimeRecord> {
    vec![CrimeRecord {
        zone: "Lisboa".to_string(),
        kind: "theft".to_string(),
        value: "31.2".to_string(),
    }]
}

pub fn se_bbox() -> BoundingBox {
    BoundingBox::new(38.70, 38.72, -9.15, -9.13).unwrap()
}

/// The four enrichment branches plus the zone lookup
pub struct Branches {
    pub places: Arc<Stub<Vec<Place>>>,
    pub traffic: Arc<Stub<Vec<TrafficWay>>>,
    pub wind: Arc<Stub<Vec<SeasonalWeather>>>,
    pub zone: Arc<Stub<ZoneIdentifier>>,
    pub crimes: Arc<Stub<Vec<CrimeRecord>>>,
}

impl Branches {
    pub fn healthy() -> Self {
        Self {
            places: Stub::ok(sample_places()).shared(),
            traffic: Stub::ok(sample_ways()).shared(),
            wind: Stub::ok(four_seasons()).shared(),
            zone: Stub::ok(lisboa_zone()).shared(),
            crimes: Stub::ok(sample_crimes()).shared(),
        }
    }

    pub fn enricher(&self, timeouts: BranchTimeouts) -> LocationEnricher {
        LocationEnricher::new(
            self.places.clone(),
            self.traffic.clone(),
            self.wind.clone(),
            ZoneResolver::new(self.zone.clone(), self.crimes.clone()),
            timeouts,
        )
    }
}
