//! Offline shipment planning against a saved capability catalog.

use std::path::Path;

use parcelwise_core::{BoxTemplate, CapabilityEntry, ParcelTypeKey, ProductKey};
use parcelwise_shipping::planner::{ShipmentPlan, ShipmentPlanner};
use serde_json::Value;
use tracing::info;

use super::CliError;
use super::input::{line_items, read_json, write_json};

/// Inputs of the `plan` command.
pub struct PlanArgs<'a> {
    pub items: &'a Path,
    pub boxes: &'a Path,
    pub catalog: &'a Path,
    pub product: Option<&'a str>,
    pub default_parcel_type: &'a str,
}

/// Plan a shipment from JSON files.
///
/// # Errors
///
/// Returns an error if an input cannot be read or parsed, if the default
/// parcel type is not a valid key, or if the order expands to too many units.
pub async fn plan(args: PlanArgs<'_>) -> Result<(), CliError> {
    let default_parcel_type = ParcelTypeKey::parse(args.default_parcel_type)?;
    let items: Vec<Value> = read_json(args.items).await?;
    let boxes: Vec<BoxTemplate> = read_json(args.boxes).await?;
    let catalog: Vec<CapabilityEntry> = read_json(args.catalog).await?;
    let product = args.product.map(ProductKey::new);

    let plan = plan_values(
        &ShipmentPlanner::new(default_parcel_type, None),
        &items,
        &boxes,
        &catalog,
        product.as_ref(),
    )?;
    info!(
        parcels = plan.parcels.len(),
        parcel_type = %plan.parcel_type.key,
        source = ?plan.parcel_type.source,
        "Planned shipment"
    );

    write_json(&plan)
}

fn plan_values(
    planner: &ShipmentPlanner,
    items: &[Value],
    boxes: &[BoxTemplate],
    catalog: &[CapabilityEntry],
    product: Option<&ProductKey>,
) -> Result<ShipmentPlan, CliError> {
    Ok(planner.plan(&line_items(items)?, boxes, catalog, product))
}
