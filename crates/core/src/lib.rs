//! Parcelwise Core - packing and parcel-type selection.
//!
//! This crate provides the carrier-agnostic logic used by the other Parcelwise
//! components:
//! - `shipping` - Carrier API client, catalog cache and HTTP service
//! - `cli` - Offline packing and planning from JSON files
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no shared state. Every call works on its own inputs and returns a
//! fresh result, so it can be used from any thread or task without
//! coordination.
//!
//! # Modules
//!
//! - [`types`] - Box templates, line items, dimensions, tiers, prices and IDs
//! - [`packing`] - First-Fit-Decreasing packing of units into boxes
//! - [`parcel_type`] - Tier selection and the fallback chain

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod packing;
pub mod parcel_type;
pub mod types;

pub use packing::{
    BoxSelection, MAX_UNITS, PackResult, Package, PackingDiagnostics, TooManyUnits,
    check_unit_count, pack_items_into_boxes, select_box_for_items, total_units,
};
pub use parcel_type::{
    ParcelTypeResolution, ParcelTypeStrategy, resolve_parcel_type, select_entry_for_packages,
    select_optimal_parcel_type, select_parcel_type_for_packages,
};
pub use types::*;
