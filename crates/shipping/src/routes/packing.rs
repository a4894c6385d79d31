//! Packing and tier selection API.
//!
//! Line items are accepted in any of the order payload shapes
//! [`JsonLineItem`] understands.

use axum::{Json, extract::State};
use parcelwise_core::{
    BoxSelection, BoxTemplate, JsonLineItem, ParcelTypeKey, ProductKey, TierConfig,
    check_unit_count, select_box_for_items, select_optimal_parcel_type,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::carrier::RouteKey;
use crate::error::AppError;
use crate::planner::ShipmentPlan;
use crate::state::AppState;

/// Request to plan a shipment.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub items: Vec<Value>,
    pub boxes: Vec<BoxTemplate>,
    pub route: RouteKey,
    #[serde(default)]
    pub product: Option<ProductKey>,
}

/// Request to pick one box for all items.
#[derive(Debug, Deserialize)]
pub struct SelectBoxRequest {
    pub items: Vec<Value>,
    pub boxes: Vec<BoxTemplate>,
}

/// Request for weight-only tier selection.
#[derive(Debug, Deserialize)]
pub struct SelectParcelTypeRequest {
    pub tiers: Vec<TierConfig>,
    pub weight_kg: f64,
}

/// Response from weight-only tier selection.
#[derive(Debug, Serialize, Deserialize)]
pub struct SelectParcelTypeResponse {
    pub parcel_type: Option<ParcelTypeKey>,
}

fn line_items(items: &[Value]) -> Result<Vec<JsonLineItem<'_>>, AppError> {
    let items: Vec<JsonLineItem<'_>> = items.iter().map(JsonLineItem::new).collect();
    check_unit_count(&items).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(items)
}

/// Plan a shipment for the given route.
///
/// POST /api/packing/plan
///
/// A catalog that cannot be fetched is treated as empty, so the plan falls
/// back to the configured default parcel type.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the items expand to too many units.
pub async fn plan(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<ShipmentPlan>, AppError> {
    let items = line_items(&req.items)?;

    let capabilities = match state.catalog().capabilities(&req.route).await {
        Ok(capabilities) => capabilities,
        Err(e) => {
            tracing::warn!(
                error = %e,
                origin = %req.route.origin_country,
                destination = %req.route.destination_country,
                "Capability catalog unavailable, planning without it"
            );
            Vec::new().into()
        }
    };

    let plan = state
        .planner()
        .plan(&items, &req.boxes, &capabilities, req.product.as_ref());

    Ok(Json(plan))
}

/// Pick the smallest box that holds every item at once.
///
/// POST /api/packing/select-box
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the items expand to too many units.
pub async fn select_box(Json(req): Json<SelectBoxRequest>) -> Result<Json<BoxSelection>, AppError> {
    let items = line_items(&req.items)?;
    Ok(Json(select_box_for_items(&items, &req.boxes)))
}

/// Pick a tier by weight alone.
///
/// POST /api/parcel-types/select
pub async fn select_parcel_type(
    Json(req): Json<SelectParcelTypeRequest>,
) -> Json<SelectParcelTypeResponse> {
    Json(SelectParcelTypeResponse {
        parcel_type: select_optimal_parcel_type(&req.tiers, req.weight_kg),
    })
}
