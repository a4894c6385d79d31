//! Core types for Parcelwise.
//!
//! This module provides type-safe wrappers for packaging configuration,
//! carrier catalog data and the geometry both algorithms share.

pub mod box_template;
pub mod capability;
pub mod id;
pub mod line_item;
pub mod measure;
pub mod parcel_key;
pub mod price;

pub use box_template::{BoxTemplate, BoxTemplateError};
pub use capability::{CapabilityEntry, PackageConstraint, ParcelTypeTier, TierConfig};
pub use id::*;
pub use line_item::{JsonLineItem, LineItem, PackableItem};
pub use measure::Dimensions;
pub use parcel_key::{ParcelTypeKey, ParcelTypeKeyError};
pub use price::{CurrencyCode, Price};
