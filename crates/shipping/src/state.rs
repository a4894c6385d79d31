//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::carrier::{CapabilityCatalog, CapabilitySource, CarrierClient, CarrierError};
use crate::config::ShippingConfig;
use crate::planner::ShipmentPlanner;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: CapabilityCatalog,
    planner: ShipmentPlanner,
}

impl AppState {
    /// Create state backed by the carrier API.
    ///
    /// # Errors
    ///
    /// Returns an error if the carrier HTTP client cannot be built.
    pub fn new(config: &ShippingConfig) -> Result<Self, CarrierError> {
        let client = CarrierClient::new(&config.carrier)?;
        let planner = ShipmentPlanner::new(
            config.planning.default_parcel_type.clone(),
            config.planning.default_product.clone(),
        );

        Ok(Self::with_source(
            Arc::new(client),
            config.carrier.catalog_ttl,
            planner,
        ))
    }

    /// Create state over any capability source.
    #[must_use]
    pub fn with_source(
        source: Arc<dyn CapabilitySource>,
        catalog_ttl: Duration,
        planner: ShipmentPlanner,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog: CapabilityCatalog::new(source, catalog_ttl),
                planner,
            }),
        }
    }

    /// Get a reference to the cached capability catalog.
    #[must_use]
    pub fn catalog(&self) -> &CapabilityCatalog {
        &self.inner.catalog
    }

    /// Get a reference to the shipment planner.
    #[must_use]
    pub fn planner(&self) -> &ShipmentPlanner {
        &self.inner.planner
    }
}
