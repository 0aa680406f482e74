//! Housing price lookup
//!
//! Prices are published per council and per district. Council prices need the
//! council's numeric area id, which comes from a static reference table keyed
//! by district. When a council cannot be resolved the district price is used.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::Result;
use crate::error::ApiError;
use crate::http::read_json;
use crate::providers::HousingPriceProvider;
use crate::scope::within;

/// District → council → area id reference table
#[derive(Debug, Clone, Default)]
pub struct AreaDirectory {
    districts: HashMap<String, HashMap<String, u32>>,
}

impl AreaDirectory {
    pub fn new(districts: HashMap<String, HashMap<String, u32>>) -> Self {
        Self {
            districts: districts
                .into_iter()
                .map(|(district, councils)| {
                    let councils = councils
                        .into_iter()
                        .map(|(council, id)| (normalize(&council), id))
                        .collect();
                    (normalize(&district), councils)
                })
                .collect(),
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let districts: HashMap<String, HashMap<String, u32>> =
            serde_json::from_str(json).context("Failed to parse area reference table")?;
        Ok(Self::new(districts))
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read area reference table {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Area id of a council; `None` when unknown or recorded as 0
    pub fn council_id(&self, district: &str, council: &str) -> Option<u32> {
        self.districts
            .get(&normalize(district))?
            .get(&normalize(council))
            .copied()
            .filter(|id| *id != 0)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: Option<i64>,
}

/// Housing price API client
#[derive(Debug, Clone)]
pub struct HousingClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl HousingClient {
    pub fn new(http: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    async fn price_at(&self, url: String) -> Result<i64> {
        let response = self.http.get(&url).timeout(self.timeout).send().await?;
        let body: PriceResponse = read_json("Housing prices", response).await?;
        body.price
            .ok_or_else(|| ApiError::response(format!("no price published at {url}")))
    }
}

#[async_trait]
impl HousingPriceProvider for HousingClient {
    #[instrument(skip(self))]
    async fn fetch_council_price(&self, area_id: u32) -> Result<i64> {
        self.price_at(format!("{}/prices/councils/{area_id}", self.base_url))
            .await
    }

    #[instrument(skip(self))]
    async fn fetch_district_price(&self, district: &str) -> Result<i64> {
        self.price_at(format!(
            "{}/prices/districts/{}",
            self.base_url,
            urlencoding::encode(district)
        ))
        .await
    }
}

/// Council-first, district-fallback price resolution
#[derive(Clone)]
pub struct HousingPriceResolver {
    provider: Arc<dyn HousingPriceProvider>,
    directory: Arc<AreaDirectory>,
    timeout: Duration,
}

impl HousingPriceResolver {
    pub fn new(
        provider: Arc<dyn HousingPriceProvider>,
        directory: Arc<AreaDirectory>,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            directory,
            timeout,
        }
    }

    /// Price for an administrative path ending `[..., municipality, district]`
    pub async fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Result<i64> {
        let Some((district, rest)) = path.split_last() else {
            return Err(ApiError::request("administrative path is empty"));
        };
        let district = district.as_ref();
        let council_id = rest
            .last()
            .and_then(|municipality| self.directory.council_id(district, municipality.as_ref()));

        match council_id {
            Some(id) => {
                debug!("Using council {} price for district {}", id, district);
                within(
                    "council price",
                    self.timeout,
                    self.provider.fetch_council_price(id),
                )
                .await
            }
            None => {
                info!("Council unresolved, falling back to district {}", district);
                within(
                    "district price",
                    self.timeout,
                    self.provider.fetch_district_price(district),
                )
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::sync::Mutex;

    const TABLE: &str = r#"{
        "Lisboa": {"Lisboa": 1106, "Sintra": 1111, "Mafra": 0},
        "Porto": {"Porto": 1312}
    }"#;

    #[derive(Default)]
    struct RecordingPrices {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HousingPriceProvider for RecordingPrices {
        async fn fetch_council_price(&self, area_id: u32) -> Result<i64> {
            self.calls.lock().unwrap().push(format!("council:{area_id}"));
            Ok(4100)
        }

        async fn fetch_district_price(&self, district: &str) -> Result<i64> {
            self.calls.lock().unwrap().push(format!("district:{district}"));
            Ok(2900)
        }
    }

    fn resolver(prices: Arc<RecordingPrices>) -> HousingPriceResolver {
        HousingPriceResolver::new(
            prices,
            Arc::new(AreaDirectory::from_json(TABLE).unwrap()),
            Duration::from_secs(1),
        )
    }

    #[test]
    fn test_directory_lookup() {
        let directory = AreaDirectory::from_json(TABLE).unwrap();
        assert_eq!(directory.council_id("Lisboa", "Sintra"), Some(1111));
        assert_eq!(directory.council_id(" lisboa ", "SINTRA"), Some(1111));
        assert_eq!(directory.council_id("Lisboa", "Mafra"), None);
        assert_eq!(directory.council_id("Faro", "Lagos"), None);
    }

    #[test]
    fn test_bad_table_is_rejected() {
        assert!(AreaDirectory::from_json("[1, 2]").is_err());
    }

    #[tokio::test]
    async fn test_council_price_first() {
        let prices = Arc::new(RecordingPrices::default());
        let price = resolver(prices.clone())
            .resolve(&["Santa Maria Maior", "Lisboa", "Lisboa"])
            .await
            .unwrap();
        assert_eq!(price, 4100);
        assert_eq!(*prices.calls.lock().unwrap(), vec!["council:1106"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_district() {
        let prices = Arc::new(RecordingPrices::default());
        let price = resolver(prices.clone())
            .resolve(&["Ericeira", "Mafra", "Lisboa"])
            .await
            .unwrap();
        assert_eq!(price, 2900);
        assert_eq!(*prices.calls.lock().unwrap(), vec!["district:Lisboa"]);
    }

    #[tokio::test]
    async fn test_district_only_path() {
        let prices = Arc::new(RecordingPrices::default());
        let price = resolver(prices.clone()).resolve(&["Porto"]).await.unwrap();
        assert_eq!(price, 2900);
    }

    #[tokio::test]
    async fn test_empty_path_is_request_error() {
        let prices = Arc::new(RecordingPrices::default());
        let err = resolver(prices.clone())
            .resolve::<&str>(&[])
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ApiRequestError);
        assert!(prices.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_price_body() {
        let body: PriceResponse = serde_json::from_str(r#"{"price": 3550}"#).unwrap();
        assert_eq!(body.price, Some(3550));
    }
}
