//! Integration tests for Parcelwise.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p parcelwise-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `packing_scenarios` - End-to-end packing and tier selection cases
//! - `packing_properties` - Property tests over random items, boxes and tiers
//! - `shipping_api` - HTTP routes over a static capability catalog
//!
//! This library holds the fixtures the test files share.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use parcelwise_core::{
    BoxId, BoxTemplate, CapabilityEntry, Dimensions, LineItem, ParcelTypeKey, ParcelTypeTier,
    ProductKey, TierConfig,
};

/// A line item of `quantity` units weighing `grams` each.
#[must_use]
pub fn item(quantity: u32, grams: f64, dims: Option<(f64, f64, f64)>) -> LineItem {
    LineItem::new(
        quantity,
        Some(grams),
        dims.map(|(l, w, h)| Dimensions::new(l, w, h)),
    )
}

/// A box template; panics on invalid input.
#[must_use]
pub fn box_template(id: &str, dims: (f64, f64, f64), max_weight_kg: Option<f64>) -> BoxTemplate {
    BoxTemplate::new(
        BoxId::new(id),
        id,
        Dimensions::new(dims.0, dims.1, dims.2),
        max_weight_kg,
    )
    .unwrap()
}

/// A valid parcel type key; panics on invalid input.
#[must_use]
pub fn key(s: &str) -> ParcelTypeKey {
    ParcelTypeKey::parse(s).unwrap()
}

/// A weight-only tier.
#[must_use]
pub fn tier(k: &str, min_weight_kg: f64, max_weight_kg: f64) -> TierConfig {
    TierConfig {
        key: key(k),
        min_weight_kg,
        max_weight_kg,
    }
}

/// A catalog row without dimension ceiling or price.
#[must_use]
pub fn capability(product: &str, k: &str, min_weight_kg: f64, max_weight_kg: f64) -> CapabilityEntry {
    CapabilityEntry {
        product: ProductKey::new(product),
        parcel_type: ParcelTypeTier {
            key: key(k),
            min_weight_kg,
            max_weight_kg,
            max_dimensions: None,
            price: None,
        },
    }
}
