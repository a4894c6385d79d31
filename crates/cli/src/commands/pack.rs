//! Offline packing commands.

use std::path::Path;

use parcelwise_core::{
    BoxSelection, BoxTemplate, PackResult, pack_items_into_boxes, select_box_for_items,
};
use serde_json::Value;
use tracing::{info, warn};

use super::CliError;
use super::input::{line_items, read_json, write_json};

/// Pack the items in `items_path` into the boxes in `boxes_path`.
///
/// # Errors
///
/// Returns an error if an input cannot be read or parsed, or if the order
/// expands to too many units.
pub async fn pack(items_path: &Path, boxes_path: &Path) -> Result<(), CliError> {
    let items: Vec<Value> = read_json(items_path).await?;
    let boxes: Vec<BoxTemplate> = read_json(boxes_path).await?;

    let result = pack_values(&items, &boxes)?;
    info!(
        packages = result.packages.len(),
        total_weight_kg = result.total_weight_kg,
        "Packed items"
    );
    if result.diagnostics.used_fallback_largest {
        warn!(
            unplaced_units = result.diagnostics.unplaced_units,
            oversized_units = result.diagnostics.oversized_units,
            "Packing fell back to the largest box"
        );
    }

    write_json(&result)
}

/// Pick one box for all items.
///
/// # Errors
///
/// Returns an error if an input cannot be read or parsed, or if the order
/// expands to too many units.
pub async fn select_box(items_path: &Path, boxes_path: &Path) -> Result<(), CliError> {
    let items: Vec<Value> = read_json(items_path).await?;
    let boxes: Vec<BoxTemplate> = read_json(boxes_path).await?;

    let selection = select_box_values(&items, &boxes)?;
    match &selection.selected_box {
        Some(selected) => info!(box_id = %selected.id, "Selected box"),
        None => warn!("No boxes configured"),
    }

    write_json(&selection)
}

fn pack_values(items: &[Value], boxes: &[BoxTemplate]) -> Result<PackResult, CliError> {
    Ok(pack_items_into_boxes(&line_items(items)?, boxes))
}

fn select_box_values(items: &[Value], boxes: &[BoxTemplate]) -> Result<BoxSelection, CliError> {
    Ok(select_box_for_items(&line_items(items)?, boxes))
}
