use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use geoenrich::api::AppState;
use geoenrich::{
    AmenitiesPipeline, AreaDirectory, CrimeStatsClient, GeoEnrichConfig, HousingClient,
    HousingPriceResolver, LocationEnricher, NominatimClient, OpenMeteoClient, OverpassClient,
    ZoneResolver, http, logging, web,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = GeoEnrichConfig::load()?;
    logging::init(&config.logging)?;
    info!("Starting geoenrich {}", geoenrich::VERSION);

    let state = build_state(&config)?;
    let timeouts = &config.timeouts;
    // the slowest pipeline is the two-stage amenities lookup
    let request_timeout = timeouts.branch_timeouts().max().max(
        timeouts.amenities_timeouts().geocoding + timeouts.amenities_timeouts().amenities,
    ) + Duration::from_secs(1);

    web::run(config.server.port, web::app(state, request_timeout)).await
}

fn build_state(config: &GeoEnrichConfig) -> Result<AppState> {
    let providers = &config.providers;
    let timeouts = &config.timeouts;
    let client = http::build_client(
        &providers.user_agent,
        Duration::from_millis(providers.connect_timeout_ms),
    )
    .context("Failed to build HTTP client")?;

    let branches = timeouts.branch_timeouts();
    let stages = timeouts.amenities_timeouts();

    let overpass = Arc::new(OverpassClient::new(
        client.clone(),
        &providers.overpass_url,
        branches.places.max(branches.traffic).max(stages.amenities),
    ));
    let nominatim = Arc::new(NominatimClient::new(
        client.clone(),
        &providers.nominatim_url,
        &providers.country,
        stages.geocoding,
    ));
    let weather = Arc::new(OpenMeteoClient::new(
        client.clone(),
        &providers.weather_url,
        branches.weather,
    ));
    let crimes = Arc::new(CrimeStatsClient::new(
        client.clone(),
        &providers.crime_url,
        branches.crime,
    ));
    let housing = Arc::new(HousingClient::new(
        client,
        &providers.housing_url,
        timeouts.housing(),
    ));

    let directory = match &config.reference.areas_path {
        Some(path) => AreaDirectory::load(path)?,
        None => {
            info!("No area reference table configured, housing prices use districts only");
            AreaDirectory::default()
        }
    };

    let enricher = LocationEnricher::new(
        overpass.clone(),
        overpass.clone(),
        weather,
        ZoneResolver::new(nominatim.clone(), crimes),
        branches,
    );
    let amenities = AmenitiesPipeline::new(
        nominatim,
        overpass,
        Arc::new(config.amenity_catalogue()),
        stages,
    );
    let housing = HousingPriceResolver::new(housing, Arc::new(directory), timeouts.housing());

    Ok(AppState {
        enricher: Arc::new(enricher),
        amenities: Arc::new(amenities),
        housing: Arc::new(housing),
    })
}
