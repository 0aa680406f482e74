//! Amenities pipeline
//!
//! Geocode an administrative area to a bounding box, then look for amenities
//! inside it. The stages run in sequence, each with its own budget.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::Result;
use crate::error::ApiError;
use crate::models::AmenitiesResult;
use crate::overpass::AmenityCatalogue;
use crate::providers::{AmenitiesProvider, BoundingBoxProvider};
use crate::scope::within;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmenitiesTimeouts {
    /// Stage one: administrative area to bounding box
    pub geocoding: Duration,
    /// Stage two: amenities inside the box
    pub amenities: Duration,
}

impl Default for AmenitiesTimeouts {
    fn default() -> Self {
        Self {
            geocoding: Duration::from_secs(20),
            amenities: Duration::from_secs(10),
        }
    }
}

#[derive(Clone)]
pub struct AmenitiesPipeline {
    geocoder: Arc<dyn BoundingBoxProvider>,
    amenities: Arc<dyn AmenitiesProvider>,
    catalogue: Arc<AmenityCatalogue>,
    timeouts: AmenitiesTimeouts,
}

impl AmenitiesPipeline {
    pub fn new(
        geocoder: Arc<dyn BoundingBoxProvider>,
        amenities: Arc<dyn AmenitiesProvider>,
        catalogue: Arc<AmenityCatalogue>,
        timeouts: AmenitiesTimeouts,
    ) -> Self {
        Self {
            geocoder,
            amenities,
            catalogue,
            timeouts,
        }
    }

    /// Amenities of the requested types inside a parish.
    ///
    /// An area the geocoder cannot find is reported as a response error.
    /// Requested types with no known tag yield an empty list, not an error.
    #[instrument(skip(self, requested_types))]
    pub async fn resolve<S: AsRef<str>>(
        &self,
        parish: &str,
        municipality: &str,
        district: &str,
        requested_types: &[S],
    ) -> Result<AmenitiesResult> {
        let bbox = within(
            "geocoding",
            self.timeouts.geocoding,
            self.geocoder
                .fetch_bounding_box(parish, municipality, district),
        )
        .await?
        .ok_or_else(|| {
            warn!("Location not found: {}, {}, {}", parish, municipality, district);
            ApiError::response(format!(
                "location not found: {parish}, {municipality}, {district}"
            ))
        })?;
        let center = bbox.center();

        let filters = self.catalogue.resolve(requested_types);
        if filters.is_empty() {
            info!("No supported amenity types requested, skipping amenities lookup");
            return Ok(AmenitiesResult {
                center,
                amenities: Vec::new(),
            });
        }

        let amenities = within(
            "amenities",
            self.timeouts.amenities,
            self.amenities.fetch_amenities(&bbox, &filters),
        )
        .await?;
        info!(
            "Found {} amenities around ({:.4}, {:.4})",
            amenities.len(),
            center.lat,
            center.lon
        );
        Ok(AmenitiesResult { center, amenities })
    }
}
