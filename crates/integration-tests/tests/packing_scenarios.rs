//! Integration tests for packing and parcel-type selection.
//!
//! Each test drives the public core API the way the shipping service does:
//! pack, derive constraints, resolve a tier.

use parcelwise_core::{
    JsonLineItem, PackageConstraint, ParcelTypeStrategy, ProductKey, pack_items_into_boxes,
    resolve_parcel_type, select_box_for_items, select_optimal_parcel_type,
    select_parcel_type_for_packages,
};
use parcelwise_integration_tests::{box_template, capability, item, key, tier};
use serde_json::json;

// =============================================================================
// Packing
// =============================================================================

#[test]
fn test_weight_limit_splits_dimensionless_units() {
    let items = [item(3, 500.0, None)];
    let boxes = [box_template("B", (30.0, 30.0, 30.0), Some(1.0))];

    let result = pack_items_into_boxes(&items, &boxes);

    assert_eq!(result.packages.len(), 2);
    assert_eq!(result.packages[0].unit_count, 2);
    assert!((result.packages[0].weight_kg - 1.0).abs() < 1e-9);
    assert_eq!(result.packages[1].unit_count, 1);
    assert!((result.packages[1].weight_kg - 0.5).abs() < 1e-9);
    assert!(!result.diagnostics.has_item_dimensions);
    assert!(!result.diagnostics.used_fallback_largest);
}

#[test]
fn test_unit_skips_box_it_does_not_fit() {
    let items = [item(1, 1000.0, Some((30.0, 30.0, 30.0)))];
    let boxes = [
        box_template("SMALL", (20.0, 20.0, 20.0), Some(5.0)),
        box_template("LARGE", (40.0, 40.0, 40.0), Some(5.0)),
    ];

    let result = pack_items_into_boxes(&items, &boxes);

    assert_eq!(result.packages.len(), 1);
    assert_eq!(result.packages[0].box_template.id.as_str(), "LARGE");
    assert!(!result.diagnostics.used_fallback_largest);
}

#[test]
fn test_no_boxes_leaves_every_unit_unplaced() {
    let items = [item(2, 100.0, None), item(3, 200.0, Some((5.0, 5.0, 5.0)))];

    let result = pack_items_into_boxes(&items, &[]);

    assert!(result.packages.is_empty());
    assert_eq!(result.diagnostics.unplaced_units, 5);
    assert!(result.diagnostics.used_fallback_largest);
    assert!((result.total_weight_kg - 0.8).abs() < 1e-9);
}

#[test]
fn test_oversized_unit_goes_to_largest_box() {
    let items = [item(1, 1000.0, Some((100.0, 10.0, 10.0)))];
    let boxes = [
        box_template("SMALL", (20.0, 20.0, 20.0), None),
        box_template("LARGE", (50.0, 50.0, 50.0), None),
    ];

    let result = pack_items_into_boxes(&items, &boxes);

    assert_eq!(result.packages.len(), 1);
    assert_eq!(result.packages[0].box_template.id.as_str(), "LARGE");
    assert!(result.diagnostics.used_fallback_largest);
    assert_eq!(result.diagnostics.oversized_units, 1);
    assert_eq!(result.diagnostics.unplaced_units, 0);
}

#[test]
fn test_json_line_items_pack_like_typed_items() {
    let raw = [
        json!({ "quantity": 2, "variant": { "weight": 400, "length": 10, "width": 10, "height": 10 } }),
        json!({ "line_item": { "quantity": "1", "product": { "weight": "300", "length": 10, "width": 5, "height": 5 } } }),
    ];
    let json_items: Vec<JsonLineItem<'_>> = raw.iter().map(JsonLineItem::new).collect();
    let typed_items = [
        item(2, 400.0, Some((10.0, 10.0, 10.0))),
        item(1, 300.0, Some((10.0, 5.0, 5.0))),
    ];
    let boxes = [box_template("B", (20.0, 20.0, 20.0), Some(10.0))];

    assert_eq!(
        pack_items_into_boxes(&json_items, &boxes),
        pack_items_into_boxes(&typed_items, &boxes)
    );
}

#[test]
fn test_select_box_for_items_picks_smallest_holding_all() {
    let items = [item(4, 250.0, Some((10.0, 10.0, 10.0)))];
    let boxes = [
        box_template("XL", (60.0, 60.0, 60.0), None),
        box_template("S", (15.0, 15.0, 15.0), None),
        box_template("M", (20.0, 20.0, 20.0), None),
    ];

    let selection = select_box_for_items(&items, &boxes);

    assert_eq!(selection.selected_box.unwrap().id.as_str(), "M");
    assert!(selection.has_item_dimensions);
    assert!(!selection.used_fallback_largest);
}

// =============================================================================
// Tier selection
// =============================================================================

#[test]
fn test_shared_boundary_weight_picks_upper_tier() {
    let tiers = [
        tier("SMALL", 0.0, 2.0),
        tier("MEDIUM", 2.0, 10.0),
        tier("LARGE", 10.0, 30.0),
    ];

    assert_eq!(select_optimal_parcel_type(&tiers, 2.0), Some(key("MEDIUM")));
    assert_eq!(select_optimal_parcel_type(&tiers, 1.99), Some(key("SMALL")));
    assert_eq!(select_optimal_parcel_type(&tiers, 30.0), Some(key("LARGE")));
    assert_eq!(select_optimal_parcel_type(&tiers, 30.5), None);
}

#[test]
fn test_boundary_weight_without_starting_tier_keeps_smaller_tier() {
    let tiers = [tier("S", 0.0, 2.0), tier("XL", 0.0, 30.0)];
    assert_eq!(select_optimal_parcel_type(&tiers, 2.0), Some(key("S")));

    let catalog = [capability("X", "S", 0.0, 2.0), capability("X", "XL", 0.0, 30.0)];
    let packages = [PackageConstraint::new(2.0, None)];
    assert_eq!(
        select_parcel_type_for_packages(&catalog, None, &packages),
        Some(key("S"))
    );
}

#[test]
fn test_heaviest_package_decides_tier() {
    let catalog = [
        capability("X", "S", 0.0, 5.0),
        capability("X", "L", 5.0, 10.0),
    ];
    let packages = [
        PackageConstraint::new(3.0, None),
        PackageConstraint::new(7.0, None),
    ];

    let selected =
        select_parcel_type_for_packages(&catalog, Some(&ProductKey::new("X")), &packages);

    assert_eq!(selected, Some(key("L")));
}

#[test]
fn test_pack_then_resolve_reports_each_source() {
    let catalog = [
        capability("X", "S", 0.0, 5.0),
        capability("X", "L", 5.0, 10.0),
    ];
    let product = ProductKey::new("X");
    let boxes = [box_template("B", (30.0, 30.0, 30.0), Some(20.0))];
    let default = key("PARCEL");

    let light = pack_items_into_boxes(&[item(2, 1500.0, None)], &boxes);
    let constraints: Vec<PackageConstraint> =
        light.packages.iter().map(|package| package.constraint()).collect();
    let resolution = resolve_parcel_type(&catalog, Some(&product), &constraints, &default);
    assert_eq!(resolution.key, key("S"));
    assert_eq!(resolution.source, ParcelTypeStrategy::Constrained);

    let heavy = pack_items_into_boxes(&[item(1, 15_000.0, None)], &boxes);
    let constraints: Vec<PackageConstraint> =
        heavy.packages.iter().map(|package| package.constraint()).collect();
    let resolution = resolve_parcel_type(&catalog, Some(&product), &constraints, &default);
    assert_eq!(resolution.key, default);
    assert_eq!(resolution.source, ParcelTypeStrategy::Default);
}
