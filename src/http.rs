//! Shared HTTP plumbing for the provider clients

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::Result;
use crate::error::ApiError;

/// Build the single pooled client every provider shares.
pub fn build_client(user_agent: &str, connect_timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(connect_timeout)
        .build()
        .map_err(|e| ApiError::internal(format!("Failed to create HTTP client: {e}")))
}

/// Read a successful, non-empty body; any other answer is a response error.
pub(crate) async fn read_body(provider: &str, response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::response(format!(
            "{provider} request failed with status {status}: {}",
            truncate_body(&body)
        )));
    }
    if body.trim().is_empty() {
        return Err(ApiError::response(format!("{provider} returned an empty body")));
    }
    Ok(body)
}

pub(crate) async fn read_json<T: DeserializeOwned>(provider: &str, response: Response) -> Result<T> {
    let body = read_body(provider, response).await?;
    serde_json::from_str(&body).map_err(|e| {
        let classified = ApiError::from(e);
        tracing::warn!("Failed to parse {} response: {}", provider, classified);
        classified
    })
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() <= MAX {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX).collect();
        format!("{cut}...")
    }
}
