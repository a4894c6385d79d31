//! Carrier capability API.
//!
//! Exposes the cached catalog a plan would be resolved against, so operators
//! can see which tiers the carrier offers on a route.

use axum::{
    Json,
    extract::{Query, State},
};
use parcelwise_core::CapabilityEntry;
use serde::Deserialize;

use crate::carrier::RouteKey;
use crate::error::AppError;
use crate::state::AppState;

/// Query parameters of the capabilities endpoint.
#[derive(Debug, Deserialize)]
pub struct CapabilitiesQuery {
    pub origin_country: String,
    pub destination_country: String,
    #[serde(default)]
    pub business: bool,
    /// Drop the cached snapshot and fetch the route again.
    #[serde(default)]
    pub refresh: bool,
}

/// List the capability rows offered on a route.
///
/// GET /api/carrier/capabilities?origin_country=DE&destination_country=NL
///
/// # Errors
///
/// Returns `AppError::Carrier` if the catalog is not cached and the carrier
/// cannot be reached.
pub async fn capabilities(
    State(state): State<AppState>,
    Query(query): Query<CapabilitiesQuery>,
) -> Result<Json<Vec<CapabilityEntry>>, AppError> {
    let route = RouteKey::new(
        &query.origin_country,
        &query.destination_country,
        query.business,
    );

    if query.refresh {
        tracing::info!(
            origin = %route.origin_country,
            destination = %route.destination_country,
            "Refreshing capability catalog"
        );
        state.catalog().invalidate(&route).await;
    }

    let entries = state.catalog().capabilities(&route).await?;
    Ok(Json(entries.to_vec()))
}
