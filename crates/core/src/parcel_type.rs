//! Carrier parcel-type tier selection.
//!
//! Carriers price shipments in tiers: each tier covers a weight range and may
//! cap the parcel size. Selection always prefers the tier with the lowest
//! maximum weight that still fits, which is the cheapest in every tiered price
//! list we have seen.
//!
//! Adjacent tiers share their boundary weight (`SMALL` is 0-2 kg, `MEDIUM`
//! 2-10 kg). Ranges are inclusive on both ends, but a weight on a shared
//! boundary belongs to the tier that starts there: a tier ending at the weight
//! is passed over only when another candidate begins at it. With `SMALL 0-2`
//! and `XL 0-30`, 2 kg stays in `SMALL`.
//!
//! Callers go through [`resolve_parcel_type`], which tries the constrained
//! selection, then weight only, then a configured default, and therefore
//! always produces a key.

use serde::{Deserialize, Serialize};

use crate::types::measure::{Dimensions, approx_eq, within_range};
use crate::types::{CapabilityEntry, PackageConstraint, ParcelTypeKey, Price, ProductKey, TierConfig};

/// Smallest tier of `sorted` holding `weight_kg` and accepted by `fits`.
///
/// `sorted` must be ordered by maximum weight. `range` yields a tier's
/// `(min, max)` weight.
fn smallest_holding<'a, T>(
    sorted: &[&'a T],
    weight_kg: f64,
    range: impl Fn(&T) -> (f64, f64),
    fits: impl Fn(&T) -> bool,
) -> Option<&'a T> {
    let candidates: Vec<&'a T> = sorted
        .iter()
        .copied()
        .filter(|tier| {
            let (min, max) = range(*tier);
            within_range(weight_kg, min, max) && fits(*tier)
        })
        .collect();

    let starts_at_weight = |tier: &T| approx_eq(range(tier).0, weight_kg);
    let boundary_shared = candidates.iter().any(|tier| starts_at_weight(*tier));

    candidates.into_iter().find(|tier| {
        !boundary_shared || starts_at_weight(*tier) || !approx_eq(range(*tier).1, weight_kg)
    })
}

/// Select the smallest weight-only tier containing `weight_kg`.
///
/// Tiers are ordered by maximum weight (ties keep their given order) and the
/// first one whose range holds the weight wins. A weight on the boundary of
/// two tiers goes to the tier starting at that weight.
#[must_use]
pub fn select_optimal_parcel_type(tiers: &[TierConfig], weight_kg: f64) -> Option<ParcelTypeKey> {
    let mut sorted: Vec<&TierConfig> = tiers.iter().collect();
    sorted.sort_by(|a, b| a.max_weight_kg.total_cmp(&b.max_weight_kg));

    smallest_holding(
        &sorted,
        weight_kg,
        |tier| (tier.min_weight_kg, tier.max_weight_kg),
        |_| true,
    )
    .map(|tier| tier.key.clone())
}

/// Weight of the heaviest single package.
///
/// Carriers rate each piece on its own, so the tier must hold the heaviest
/// piece; the shipment total plays no part.
#[must_use]
pub fn heaviest_package_kg(packages: &[PackageConstraint]) -> f64 {
    packages
        .iter()
        .map(|package| package.weight_kg)
        .fold(0.0, f64::max)
}

/// Componentwise maximum of length, width and height over the packages that
/// have dimensions. Packages without dimensions are skipped, not counted as
/// zero.
#[must_use]
pub fn max_package_dimensions(packages: &[PackageConstraint]) -> Option<Dimensions> {
    packages
        .iter()
        .filter_map(|package| package.dimensions)
        .reduce(|acc, dims| acc.max_components(&dims))
}

/// Capability rows for `product` (every row when `product` is `None`),
/// ordered by maximum weight. Ties keep catalog order.
fn entries_by_max_weight<'a>(
    capabilities: &'a [CapabilityEntry],
    product: Option<&ProductKey>,
) -> Vec<&'a CapabilityEntry> {
    let mut entries: Vec<&CapabilityEntry> = capabilities
        .iter()
        .filter(|entry| product.is_none_or(|key| entry.product == *key))
        .collect();
    entries.sort_by(|a, b| {
        a.parcel_type
            .max_weight_kg
            .total_cmp(&b.parcel_type.max_weight_kg)
    });
    entries
}

fn weight_range(entry: &CapabilityEntry) -> (f64, f64) {
    (entry.parcel_type.min_weight_kg, entry.parcel_type.max_weight_kg)
}

/// The capability row [`select_parcel_type_for_packages`] picks.
#[must_use]
pub fn select_entry_for_packages<'a>(
    capabilities: &'a [CapabilityEntry],
    product: Option<&ProductKey>,
    packages: &[PackageConstraint],
) -> Option<&'a CapabilityEntry> {
    let envelope = max_package_dimensions(packages);

    smallest_holding(
        &entries_by_max_weight(capabilities, product),
        heaviest_package_kg(packages),
        weight_range,
        |entry| match (envelope, entry.parcel_type.max_dimensions) {
            (Some(envelope), Some(ceiling)) => envelope.fits_within(&ceiling),
            _ => true,
        },
    )
}

/// Select the smallest tier of `product` that holds every package.
///
/// The heaviest package must lie in the tier's weight range, and when both the
/// tier declares a dimension ceiling and some package declares dimensions, the
/// componentwise largest package envelope must fit the ceiling in some
/// orientation.
///
/// Returns `None` when no tier qualifies; see [`resolve_parcel_type`] for the
/// fallbacks.
#[must_use]
pub fn select_parcel_type_for_packages(
    capabilities: &[CapabilityEntry],
    product: Option<&ProductKey>,
    packages: &[PackageConstraint],
) -> Option<ParcelTypeKey> {
    select_entry_for_packages(capabilities, product, packages)
        .map(|entry| entry.parcel_type.key.clone())
}

/// Weight-only pass over capability rows, keeping the winning row so its
/// product and price stay attached.
fn select_entry_for_weight<'a>(
    capabilities: &'a [CapabilityEntry],
    product: Option<&ProductKey>,
    weight_kg: f64,
) -> Option<&'a CapabilityEntry> {
    smallest_holding(
        &entries_by_max_weight(capabilities, product),
        weight_kg,
        weight_range,
        |_| true,
    )
}

/// The steps of the tier fallback chain, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelTypeStrategy {
    /// Weight range and dimension ceiling, per package.
    Constrained,
    /// Weight range only, for the heaviest package.
    WeightOnly,
    /// The configured default key.
    Default,
}

impl ParcelTypeStrategy {
    /// Strategies that may find nothing. [`ParcelTypeStrategy::Default`]
    /// always answers and closes the chain.
    pub const FALLIBLE: [Self; 2] = [Self::Constrained, Self::WeightOnly];

    fn resolve(
        self,
        capabilities: &[CapabilityEntry],
        product: Option<&ProductKey>,
        packages: &[PackageConstraint],
        default: &ParcelTypeKey,
    ) -> Option<ParcelTypeResolution> {
        let entry = match self {
            Self::Constrained => select_entry_for_packages(capabilities, product, packages),
            Self::WeightOnly => {
                select_entry_for_weight(capabilities, product, heaviest_package_kg(packages))
            }
            Self::Default => return Some(ParcelTypeResolution::fallback(default)),
        };
        entry.map(|entry| ParcelTypeResolution {
            key: entry.parcel_type.key.clone(),
            source: self,
            product: Some(entry.product.clone()),
            price: entry.parcel_type.price,
        })
    }
}

/// A tier key together with the strategy that produced it.
///
/// `product` and `price` come from the capability row that won; both are
/// `None` for the default key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParcelTypeResolution {
    pub key: ParcelTypeKey,
    pub source: ParcelTypeStrategy,
    #[serde(default)]
    pub product: Option<ProductKey>,
    #[serde(default)]
    pub price: Option<Price>,
}

impl ParcelTypeResolution {
    fn fallback(default: &ParcelTypeKey) -> Self {
        Self {
            key: default.clone(),
            source: ParcelTypeStrategy::Default,
            product: None,
            price: None,
        }
    }
}

/// Resolve the tier for a shipment, never leaving it unset.
///
/// Tries each of [`ParcelTypeStrategy::FALLIBLE`] in order and falls back to
/// `default`.
#[must_use]
pub fn resolve_parcel_type(
    capabilities: &[CapabilityEntry],
    product: Option<&ProductKey>,
    packages: &[PackageConstraint],
    default: &ParcelTypeKey,
) -> ParcelTypeResolution {
    ParcelTypeStrategy::FALLIBLE
        .into_iter()
        .find_map(|strategy| strategy.resolve(capabilities, product, packages, default))
        .unwrap_or_else(|| ParcelTypeResolution::fallback(default))
}
