//! Greedy packing of purchased units into configured boxes.
//!
//! # Algorithm
//!
//! First-Fit-Decreasing: line items are expanded into one unit per purchased
//! quantity, units are ordered by volume (largest first) and each unit goes
//! into the first open package that still has room. When none has room, a
//! package is opened with the smallest box that holds the unit on its own.
//! When no box holds it at all, the largest box is used anyway and the result
//! is flagged.
//!
//! Missing data never fails a packing call. Units without dimensions are
//! placed by weight alone, and an empty box list yields no packages with the
//! diagnostics saying so.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::measure::{Dimensions, grams_to_kg, within_limit};
use crate::types::{BoxTemplate, PackableItem, PackageConstraint};

/// One physical instance of a purchased item.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Unit {
    weight_kg: f64,
    dimensions: Option<Dimensions>,
}

impl Unit {
    fn volume(&self) -> f64 {
        self.dimensions.map_or(0.0, |dims| dims.volume())
    }
}

/// A box in use, with running totals of what has been put in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub box_template: BoxTemplate,
    pub weight_kg: f64,
    /// Sum of the volumes of dimensioned units.
    pub volume_cm3: f64,
    pub unit_count: u32,
    /// `false` once a unit without dimensions has been added, after which
    /// `volume_cm3` understates the real fill.
    pub all_units_dimensioned: bool,
}

impl Package {
    fn open(box_template: &BoxTemplate) -> Self {
        Self {
            box_template: box_template.clone(),
            weight_kg: 0.0,
            volume_cm3: 0.0,
            unit_count: 0,
            all_units_dimensioned: true,
        }
    }

    fn add(&mut self, unit: &Unit) {
        self.weight_kg += unit.weight_kg;
        self.volume_cm3 += unit.volume();
        self.unit_count += 1;
        self.all_units_dimensioned &= unit.dimensions.is_some();
    }

    /// Whether `unit` can join this package.
    ///
    /// With `check_dimensions` off (no unit in the call has dimensions) only
    /// the weight limit applies. A unit without dimensions is let in on
    /// weight alone.
    fn accepts(&self, unit: &Unit, check_dimensions: bool) -> bool {
        if !self.box_template.accepts_weight(self.weight_kg + unit.weight_kg) {
            return false;
        }
        if !check_dimensions {
            return true;
        }
        let Some(dims) = unit.dimensions else {
            return true;
        };
        within_limit(self.volume_cm3 + dims.volume(), self.box_template.volume())
            && dims.fits_within(&self.box_template.dimensions)
    }

    /// The weight and outer size carriers see for this package.
    #[must_use]
    pub fn constraint(&self) -> PackageConstraint {
        PackageConstraint::new(self.weight_kg, Some(self.box_template.dimensions))
    }
}

/// Whether an empty `box_template` can hold `unit` on its own.
fn holds_alone(box_template: &BoxTemplate, unit: &Unit) -> bool {
    box_template.accepts_weight(unit.weight_kg)
        && unit
            .dimensions
            .is_none_or(|dims| dims.fits_within(&box_template.dimensions))
}

/// Soft-fallback signals from a packing call. Informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingDiagnostics {
    /// At least one unit carried dimensions.
    pub has_item_dimensions: bool,
    /// A unit went to the largest box without fitting, no boxes were
    /// configured, or some units had dimensions and others did not.
    pub used_fallback_largest: bool,
    /// Units that ended up in no package (only when no boxes are configured).
    pub unplaced_units: usize,
    /// Units placed in the largest box although they exceed it.
    pub oversized_units: usize,
}

/// Output of [`pack_items_into_boxes`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackResult {
    pub packages: Vec<Package>,
    /// Weight of every purchased unit, placed or not.
    pub total_weight_kg: f64,
    pub diagnostics: PackingDiagnostics,
}

/// Output of [`select_box_for_items`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSelection {
    pub selected_box: Option<BoxTemplate>,
    pub total_weight_kg: f64,
    pub has_item_dimensions: bool,
    pub used_fallback_largest: bool,
}

/// Total weight of all items in kilograms: per-unit grams / 1000 × quantity.
///
/// Items without a usable weight count as zero.
#[must_use]
pub fn total_weight_kg<I: PackableItem>(items: &[I]) -> f64 {
    items
        .iter()
        .map(|item| unit_weight_kg(item) * f64::from(item.quantity()))
        .sum()
}

/// Weight of one unit of `item`. Negative or non-finite weights are treated
/// as missing.
fn unit_weight_kg<I: PackableItem>(item: &I) -> f64 {
    let grams = item
        .weight_grams()
        .filter(|grams| grams.is_finite() && *grams >= 0.0)
        .unwrap_or(0.0);
    grams_to_kg(grams)
}

/// Largest number of units a single packing call should be given.
///
/// Packing materialises one entry per unit, so callers taking quantities from
/// untrusted input check them with [`check_unit_count`] first.
pub const MAX_UNITS: u64 = 10_000;

/// The items expand to more than [`MAX_UNITS`] units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{units} units exceed the limit of {max}")]
pub struct TooManyUnits {
    pub units: u64,
    pub max: u64,
}

/// Sum of all quantities.
#[must_use]
pub fn total_units<I: PackableItem>(items: &[I]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity())).sum()
}

/// Returns the unit count, or an error if it exceeds [`MAX_UNITS`].
///
/// # Errors
///
/// Returns [`TooManyUnits`] when the items expand to more than
/// [`MAX_UNITS`] units.
pub fn check_unit_count<I: PackableItem>(items: &[I]) -> Result<u64, TooManyUnits> {
    let units = total_units(items);
    if units > MAX_UNITS {
        return Err(TooManyUnits {
            units,
            max: MAX_UNITS,
        });
    }
    Ok(units)
}

fn expand_units<I: PackableItem>(items: &[I]) -> Vec<Unit> {
    items
        .iter()
        .flat_map(|item| {
            let unit = Unit {
                weight_kg: unit_weight_kg(item),
                dimensions: item.dimensions_cm().filter(Dimensions::is_positive),
            };
            std::iter::repeat_n(unit, item.quantity() as usize)
        })
        .collect()
}

/// Boxes ordered by interior volume, smallest first. Equal volumes keep their
/// configured order.
fn boxes_by_volume(boxes: &[BoxTemplate]) -> Vec<&BoxTemplate> {
    let mut sorted: Vec<&BoxTemplate> = boxes.iter().collect();
    sorted.sort_by(|a, b| a.volume().total_cmp(&b.volume()));
    sorted
}

/// Pack line items into packages using the configured boxes.
///
/// Never fails: every gap in the input degrades to a flagged fallback in
/// [`PackingDiagnostics`].
#[must_use]
pub fn pack_items_into_boxes<I: PackableItem>(items: &[I], boxes: &[BoxTemplate]) -> PackResult {
    let total_weight_kg = total_weight_kg(items);

    let mut units = expand_units(items);
    let has_item_dimensions = units.iter().any(|unit| unit.dimensions.is_some());
    units.sort_by(|a, b| b.volume().total_cmp(&a.volume()));

    let boxes = boxes_by_volume(boxes);
    let Some(&largest) = boxes.last() else {
        return PackResult {
            packages: Vec::new(),
            total_weight_kg,
            diagnostics: PackingDiagnostics {
                has_item_dimensions,
                used_fallback_largest: true,
                unplaced_units: units.len(),
                oversized_units: 0,
            },
        };
    };

    let mut packages: Vec<Package> = Vec::new();
    let mut oversized_units = 0;

    for unit in &units {
        if let Some(package) = packages
            .iter_mut()
            .find(|package| package.accepts(unit, has_item_dimensions))
        {
            package.add(unit);
            continue;
        }

        let box_template = if let Some(smallest) = boxes.iter().find(|bx| holds_alone(bx, unit)) {
            *smallest
        } else {
            oversized_units += 1;
            largest
        };

        let mut package = Package::open(box_template);
        package.add(unit);
        packages.push(package);
    }

    let partially_dimensioned =
        has_item_dimensions && units.iter().any(|unit| unit.dimensions.is_none());

    PackResult {
        packages,
        total_weight_kg,
        diagnostics: PackingDiagnostics {
            has_item_dimensions,
            used_fallback_largest: oversized_units > 0 || partially_dimensioned,
            unplaced_units: 0,
            oversized_units,
        },
    }
}

/// Pick one box for all items together.
///
/// The aggregate is the total weight, the summed volume of dimensioned units
/// and an envelope made of the largest sorted side of any unit in each
/// position. The smallest box holding the aggregate wins; when none does, the
/// largest box is returned and flagged. Used for display and diagnostics, not
/// for splitting a shipment.
#[must_use]
pub fn select_box_for_items<I: PackableItem>(items: &[I], boxes: &[BoxTemplate]) -> BoxSelection {
    let total_weight_kg = total_weight_kg(items);
    let units = expand_units(items);

    let aggregate_volume: f64 = units.iter().map(Unit::volume).sum();
    let envelope = units
        .iter()
        .filter_map(|unit| unit.dimensions)
        .reduce(|acc, dims| acc.max_sorted(&dims));
    let has_item_dimensions = envelope.is_some();

    let boxes = boxes_by_volume(boxes);
    let Some(&largest) = boxes.last() else {
        return BoxSelection {
            selected_box: None,
            total_weight_kg,
            has_item_dimensions,
            used_fallback_largest: true,
        };
    };

    let fitting = boxes.iter().find(|bx| {
        bx.accepts_weight(total_weight_kg)
            && envelope.is_none_or(|env| {
                within_limit(aggregate_volume, bx.volume()) && env.fits_within(&bx.dimensions)
            })
    });

    BoxSelection {
        selected_box: Some(fitting.copied().unwrap_or(largest).clone()),
        total_weight_kg,
        has_item_dimensions,
        used_fallback_largest: fitting.is_none(),
    }
}
