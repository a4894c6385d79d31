//! HTTP route handlers for the shipping service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Health check
//!
//! # Packing API (JSON)
//! POST /api/packing/plan        - Pack, resolve a tier and build label parcels
//! POST /api/packing/select-box  - Single smallest box for all items
//! POST /api/parcel-types/select - Weight-only tier selection
//!
//! # Carrier API (JSON)
//! GET  /api/carrier/capabilities - Cached capability rows for a route
//! ```

pub mod carrier;
pub mod packing;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the packing API router.
pub fn packing_routes() -> Router<AppState> {
    Router::new()
        .route("/plan", post(packing::plan))
        .route("/select-box", post(packing::select_box))
}

/// Create all routes for the shipping service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/packing", packing_routes())
        .route("/api/parcel-types/select", post(packing::select_parcel_type))
        .route("/api/carrier/capabilities", get(carrier::capabilities))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
