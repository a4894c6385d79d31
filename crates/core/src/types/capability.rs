//! Carrier capability catalog rows and per-package constraints.

use serde::{Deserialize, Serialize};

use super::id::ProductKey;
use super::measure::Dimensions;
use super::parcel_key::ParcelTypeKey;
use super::price::Price;

/// A weight-only tier, as configured for one shipping product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    pub key: ParcelTypeKey,
    pub min_weight_kg: f64,
    pub max_weight_kg: f64,
}

/// A parcel-type tier published by the carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelTypeTier {
    pub key: ParcelTypeKey,
    #[serde(default)]
    pub min_weight_kg: f64,
    pub max_weight_kg: f64,
    /// Largest parcel the tier accepts; `None` means weight is the only limit.
    #[serde(default)]
    pub max_dimensions: Option<Dimensions>,
    #[serde(default)]
    pub price: Option<Price>,
}

/// One row of the capability catalog: a tier offered for a shipping product
/// on the route the catalog was fetched for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityEntry {
    pub product: ProductKey,
    pub parcel_type: ParcelTypeTier,
}

/// Weight and outer size of one physical piece, as seen by tier selection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackageConstraint {
    pub weight_kg: f64,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

impl PackageConstraint {
    /// Create a constraint.
    #[must_use]
    pub const fn new(weight_kg: f64, dimensions: Option<Dimensions>) -> Self {
        Self {
            weight_kg,
            dimensions,
        }
    }
}
