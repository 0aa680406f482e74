//! Crime statistics client

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{info, instrument};

use crate::Result;
use crate::http::read_json;
use crate::models::{CrimeRecord, ZoneIdentifier};
use crate::providers::CrimeProvider;

#[derive(Debug, Serialize)]
struct CrimeQuery<'a> {
    zones: &'a BTreeSet<ZoneIdentifier>,
}

/// Crime statistics API client
#[derive(Debug, Clone)]
pub struct CrimeStatsClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl CrimeStatsClient {
    pub fn new(http: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl CrimeProvider for CrimeStatsClient {
    #[instrument(skip(self), fields(zones = zones.len()))]
    async fn fetch_crimes(&self, zones: &BTreeSet<ZoneIdentifier>) -> Result<Vec<CrimeRecord>> {
        if zones.is_empty() {
            return Ok(Vec::new());
        }
        let response = self
            .http
            .post(format!("{}/crimes", self.base_url))
            .timeout(self.timeout)
            .json(&CrimeQuery { zones })
            .send()
            .await?;
        let records: Vec<CrimeRecord> = read_json("Crime statistics", response).await?;
        info!("Received {} crime records", records.len());
        Ok(records)
    }
}
