use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    AmenitiesPipeline, HousingPriceResolver, LocationEnricher,
    error::{ApiError, ErrorKind},
    models::{AmenitiesResult, LocationEnrichment},
};

/// Pipelines shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub enricher: Arc<LocationEnricher>,
    pub amenities: Arc<AmenitiesPipeline>,
    pub housing: Arc<HousingPriceResolver>,
}

#[derive(Debug, Deserialize)]
pub struct EnrichmentParams {
    pub lat: f64,
    pub lon: f64,
    /// Meters
    pub radius: f64,
}

#[derive(Debug, Deserialize)]
pub struct AmenitiesParams {
    pub parish: String,
    pub municipality: String,
    pub district: String,
    /// Comma separated type names
    #[serde(default)]
    pub types: String,
}

#[derive(Debug, Deserialize)]
pub struct HousingParams {
    /// Comma separated, ending with municipality and district
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HousingPrice {
    pub price: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorKind,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorBody {
            error: self.kind(),
            message: self.message().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/enrichment", get(get_enrichment))
        .route("/amenities", get(get_amenities))
        .route("/housing-price", get(get_housing_price))
        .with_state(state)
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn bad_query(rejection: QueryRejection) -> ApiError {
    ApiError::request(rejection.body_text())
}

async fn get_enrichment(
    State(state): State<AppState>,
    params: Result<Query<EnrichmentParams>, QueryRejection>,
) -> Result<Json<LocationEnrichment>, ApiError> {
    let Query(params) = params.map_err(bad_query)?;
    let enrichment = state
        .enricher
        .enrich(params.lat, params.lon, params.radius)
        .await?;
    Ok(Json(enrichment))
}

async fn get_amenities(
    State(state): State<AppState>,
    params: Result<Query<AmenitiesParams>, QueryRejection>,
) -> Result<Json<AmenitiesResult>, ApiError> {
    let Query(params) = params.map_err(bad_query)?;
    let types = split_list(&params.types);
    debug!("Amenity types requested: {:?}", types);
    let result = state
        .amenities
        .resolve(&params.parish, &params.municipality, &params.district, &types)
        .await?;
    Ok(Json(result))
}

async fn get_housing_price(
    State(state): State<AppState>,
    params: Result<Query<HousingParams>, QueryRejection>,
) -> Result<Json<HousingPrice>, ApiError> {
    let Query(params) = params.map_err(bad_query)?;
    let price = state.housing.resolve(&split_list(&params.path)).await?;
    Ok(Json(HousingPrice { price }))
}
