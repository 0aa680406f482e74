//! Two-stage amenities lookup against stub providers

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{Stub, se_bbox, tags};
use geoenrich::error::{ApiError, ErrorKind};
use geoenrich::models::{Amenity, BoundingBox, GeoPoint};
use geoenrich::{AmenitiesPipeline, AmenitiesTimeouts, AmenityCatalogue};

fn school() -> Amenity {
    Amenity {
        id: "node/4242".to_string(),
        lat: 38.7101,
        lon: -9.1382,
        tags: tags(&[("amenity", "school"), ("name", "Escola Básica do Castelo")]),
    }
}

fn pipeline(
    geocoder: Arc<Stub<Option<BoundingBox>>>,
    amenities: Arc<Stub<Vec<Amenity>>>,
) -> AmenitiesPipeline {
    AmenitiesPipeline::new(
        geocoder,
        amenities,
        Arc::new(AmenityCatalogue::default()),
        AmenitiesTimeouts::default(),
    )
}

#[tokio::test]
async fn test_schools_in_se() {
    let geocoder = Stub::ok(Some(se_bbox())).shared();
    let amenities = Stub::ok(vec![school()]).shared();

    let result = pipeline(geocoder.clone(), amenities.clone())
        .resolve("Sé", "Lisboa", "Lisboa", &["Escolas"])
        .await
        .unwrap();

    assert_eq!(result.amenities, vec![school()]);
    assert_eq!(geocoder.seen(), vec!["Sé, Lisboa, Lisboa"]);
    assert_eq!(amenities.call_count(), 1);
    assert_eq!(
        amenities.seen(),
        vec![r#"["amenity"="school"](38.7,-9.15,38.72,-9.13)"#]
    );
    assert!((result.center.lat - 38.71).abs() < 1e-9);
    assert!((result.center.lon + 9.14).abs() < 1e-9);
}

#[tokio::test]
async fn test_unsupported_types_skip_amenities_call() {
    let geocoder = Stub::ok(Some(se_bbox())).shared();
    let amenities = Stub::ok(vec![school()]).shared();

    let result = pipeline(geocoder, amenities.clone())
        .resolve("Sé", "Lisboa", "Lisboa", &["Castelos", "Miradouros"])
        .await
        .unwrap();

    assert!(result.amenities.is_empty());
    assert_eq!(result.center, se_bbox().center());
    assert_eq!(amenities.call_count(), 0);
}

#[tokio::test]
async fn test_no_types_requested() {
    let amenities = Stub::ok(vec![school()]).shared();

    let result = pipeline(Stub::ok(Some(se_bbox())).shared(), amenities.clone())
        .resolve::<&str>("Sé", "Lisboa", "Lisboa", &[])
        .await
        .unwrap();

    assert!(result.amenities.is_empty());
    assert_eq!(amenities.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_area_never_reaches_second_stage() {
    let geocoder = Stub::ok(None).shared();
    let amenities = Stub::ok(vec![school()]).shared();

    let err = pipeline(geocoder, amenities.clone())
        .resolve("Atlântida", "Lisboa", "Lisboa", &["Escolas"])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ApiResponseError);
    assert!(err.message().contains("not found"));
    assert_eq!(amenities.call_count(), 0);
}

#[tokio::test]
async fn test_geocoding_failure_propagates() {
    let geocoder = Stub::failing(ApiError::request("connection refused")).shared();
    let amenities = Stub::ok(vec![school()]).shared();

    let err = pipeline(geocoder, amenities.clone())
        .resolve("Sé", "Lisboa", "Lisboa", &["Escolas"])
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ApiRequestError);
    assert_eq!(amenities.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_stages_have_independent_budgets() {
    // 15s is inside the geocoding budget but outside the amenities one
    let geocoder = Stub::ok(Some(se_bbox()))
        .after(Duration::from_secs(15))
        .shared();
    let amenities = Stub::ok(vec![school()]).shared();
    let result = pipeline(geocoder, amenities)
        .resolve("Sé", "Lisboa", "Lisboa", &["Escolas"])
        .await;
    assert!(result.is_ok());

    let geocoder = Stub::ok(Some(se_bbox())).shared();
    let amenities = Stub::ok(vec![school()])
        .after(Duration::from_secs(15))
        .shared();
    let err = pipeline(geocoder, amenities.clone())
        .resolve("Sé", "Lisboa", "Lisboa", &["Escolas"])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ApiTimeout);
    assert!(err.message().contains("amenities"));
    assert!(amenities.was_abandoned());
}

#[tokio::test]
async fn test_center_lies_inside_box() {
    let bbox = BoundingBox::new(41.14, 41.16, -8.62, -8.60).unwrap();
    let result = pipeline(Stub::ok(Some(bbox)).shared(), Stub::ok(vec![]).shared())
        .resolve("Cedofeita", "Porto", "Porto", &["Hospitais"])
        .await
        .unwrap();

    assert!(bbox.contains(&result.center));
    assert!(result.center.distance_to(&GeoPoint::new(41.15, -8.61).unwrap()) < 1.0);
}
