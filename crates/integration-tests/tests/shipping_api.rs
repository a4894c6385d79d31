//! Integration tests for the shipping HTTP routes.
//!
//! The router runs against a static capability catalog, so no carrier API is
//! contacted.

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use parcelwise_core::CapabilityEntry;
use parcelwise_integration_tests::{capability, key};
use parcelwise_shipping::carrier::StaticCatalog;
use parcelwise_shipping::planner::{ShipmentPlan, ShipmentPlanner};
use parcelwise_shipping::routes::routes;
use parcelwise_shipping::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app(catalog: Vec<CapabilityEntry>) -> axum::Router {
    let state = AppState::with_source(
        Arc::new(StaticCatalog(catalog)),
        Duration::from_secs(300),
        ShipmentPlanner::new(key("PARCEL"), None),
    );
    routes().with_state(state)
}

async fn post(app: axum::Router, uri: &str, body: &Value) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_plan_splits_heavy_order_and_picks_tier_for_heaviest_parcel() {
    let catalog = vec![
        capability("X", "S", 0.0, 5.0),
        capability("X", "L", 5.0, 10.0),
        capability("Y", "ONLY", 0.0, 100.0),
    ];
    let body = json!({
        "items": [
            { "quantity": 1, "variant": { "weight": 7000 } },
            { "quantity": 1, "variant": { "weight": 3000 } }
        ],
        "boxes": [ { "id": "BOX", "length": 40, "width": 40, "height": 40, "max_weight_kg": 8 } ],
        "route": { "origin_country": "DE", "destination_country": "FR" },
        "product": "X"
    });

    let (status, bytes) = post(app(catalog), "/api/packing/plan", &body).await;
    assert_eq!(status, StatusCode::OK);
    let plan: ShipmentPlan = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(plan.parcels.len(), 2);
    assert_eq!(plan.parcels[0].weight_grams, 7000);
    assert_eq!(plan.parcels[1].weight_grams, 3000);
    assert_eq!(plan.parcel_type.key, key("L"));
    assert!(plan.parcels.iter().all(|parcel| parcel.parcel_type == key("L")));
}

#[tokio::test]
async fn test_plan_without_boxes_still_yields_a_parcel_type() {
    let body = json!({
        "items": [ { "quantity": 5, "product": { "weight": 100 } } ],
        "boxes": [],
        "route": { "origin_country": "DE", "destination_country": "DE" }
    });

    let (status, bytes) = post(app(Vec::new()), "/api/packing/plan", &body).await;
    assert_eq!(status, StatusCode::OK);
    let plan: ShipmentPlan = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(plan.diagnostics.unplaced_units, 5);
    assert!(plan.diagnostics.used_fallback_largest);
    assert_eq!(plan.parcels.len(), 1);
    assert_eq!(plan.parcels[0].weight_grams, 500);
    assert_eq!(plan.parcel_type.key, key("PARCEL"));
}

#[tokio::test]
async fn test_select_parcel_type_endpoint() {
    let body = json!({
        "tiers": [
            { "key": "LARGE", "min_weight_kg": 10, "max_weight_kg": 30 },
            { "key": "SMALL", "min_weight_kg": 0, "max_weight_kg": 2 },
            { "key": "MEDIUM", "min_weight_kg": 2, "max_weight_kg": 10 }
        ],
        "weight_kg": 10
    });

    let (status, bytes) = post(app(Vec::new()), "/api/parcel-types/select", &body).await;
    assert_eq!(status, StatusCode::OK);
    let response: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(response["parcel_type"], "LARGE");
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (status, _) = post(
        app(Vec::new()),
        "/api/packing/select-box",
        &json!({ "items": "not a list" }),
    )
    .await;
    assert!(status.is_client_error());
}
