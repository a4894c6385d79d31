//! Shipment planning: packing, tier resolution and label parcels.

use parcelwise_core::measure::kg_to_billable_grams;
use parcelwise_core::{
    BoxId, BoxTemplate, CapabilityEntry, Dimensions, PackResult, PackableItem, PackageConstraint,
    PackingDiagnostics, ParcelTypeKey, ParcelTypeResolution, ParcelTypeStrategy, Price,
    ProductKey, pack_items_into_boxes, resolve_parcel_type,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// One parcel to put a label on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedParcel {
    /// Box the parcel is packed in; `None` when no box was configured.
    pub box_id: Option<BoxId>,
    pub box_name: Option<String>,
    /// Billable weight, rounded up to whole grams.
    pub weight_grams: u32,
    pub dimensions: Option<Dimensions>,
    pub unit_count: u32,
    pub parcel_type: ParcelTypeKey,
}

/// A label-ready shipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentPlan {
    pub parcels: Vec<PlannedParcel>,
    pub parcel_type: ParcelTypeResolution,
    /// Product of the winning catalog row, else the requested product.
    pub product: Option<ProductKey>,
    pub total_weight_kg: f64,
    pub diagnostics: PackingDiagnostics,
    /// Price of the winning catalog row times the number of parcels.
    pub price_estimate: Option<Price>,
}

/// Turns line items into a [`ShipmentPlan`] against a capability catalog.
#[derive(Debug, Clone)]
pub struct ShipmentPlanner {
    default_parcel_type: ParcelTypeKey,
    default_product: Option<ProductKey>,
}

impl ShipmentPlanner {
    #[must_use]
    pub const fn new(default_parcel_type: ParcelTypeKey, default_product: Option<ProductKey>) -> Self {
        Self {
            default_parcel_type,
            default_product,
        }
    }

    #[must_use]
    pub const fn default_parcel_type(&self) -> &ParcelTypeKey {
        &self.default_parcel_type
    }

    /// Plan a shipment.
    ///
    /// `product` overrides the configured default product. With no product
    /// at all, every tier in `capabilities` is considered.
    #[must_use]
    pub fn plan<I: PackableItem>(
        &self,
        items: &[I],
        boxes: &[BoxTemplate],
        capabilities: &[CapabilityEntry],
        product: Option<&ProductKey>,
    ) -> ShipmentPlan {
        let packed = pack_items_into_boxes(items, boxes);
        log_diagnostics(&packed);

        let constraints = constraints_for(&packed);
        let product = product.or(self.default_product.as_ref());
        let resolution =
            resolve_parcel_type(capabilities, product, &constraints, &self.default_parcel_type);

        if resolution.source == ParcelTypeStrategy::Default {
            info!(
                parcel_type = %resolution.key,
                catalog_rows = capabilities.len(),
                "No catalog tier fits, using default parcel type"
            );
        } else {
            debug!(parcel_type = %resolution.key, source = ?resolution.source, "Resolved parcel type");
        }

        let parcels = if packed.packages.is_empty() {
            let unit_count = items
                .iter()
                .fold(0_u32, |sum, item| sum.saturating_add(item.quantity()));
            vec![PlannedParcel {
                box_id: None,
                box_name: None,
                weight_grams: kg_to_billable_grams(packed.total_weight_kg),
                dimensions: None,
                unit_count,
                parcel_type: resolution.key.clone(),
            }]
        } else {
            packed
                .packages
                .iter()
                .map(|package| PlannedParcel {
                    box_id: Some(package.box_template.id.clone()),
                    box_name: Some(package.box_template.name.clone()),
                    weight_grams: kg_to_billable_grams(package.weight_kg),
                    dimensions: Some(package.box_template.dimensions),
                    unit_count: package.unit_count,
                    parcel_type: resolution.key.clone(),
                })
                .collect()
        };

        let price_estimate = resolution.price.map(|price| price.times(parcels.len()));
        let product = resolution.product.clone().or_else(|| product.cloned());

        ShipmentPlan {
            parcels,
            parcel_type: resolution,
            product,
            total_weight_kg: packed.total_weight_kg,
            diagnostics: packed.diagnostics,
            price_estimate,
        }
    }
}

/// One constraint per package, or a single dimension-less one carrying the
/// total weight when nothing was packed.
fn constraints_for(packed: &PackResult) -> Vec<PackageConstraint> {
    if packed.packages.is_empty() {
        vec![PackageConstraint::new(packed.total_weight_kg, None)]
    } else {
        packed.packages.iter().map(parcelwise_core::Package::constraint).collect()
    }
}

fn log_diagnostics(packed: &PackResult) {
    let diagnostics = &packed.diagnostics;
    if diagnostics.used_fallback_largest || diagnostics.unplaced_units > 0 {
        warn!(
            packages = packed.packages.len(),
            has_item_dimensions = diagnostics.has_item_dimensions,
            unplaced_units = diagnostics.unplaced_units,
            oversized_units = diagnostics.oversized_units,
            "Packing fell back to the largest box"
        );
    }
}
