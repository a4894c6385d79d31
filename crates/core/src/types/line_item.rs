//! Read-only view of purchased line items.
//!
//! The packer never sees the full order-domain item. It only needs a quantity,
//! a per-unit weight and optional per-unit dimensions, exposed through
//! [`PackableItem`]. Callers with typed data implement the trait directly or
//! use [`LineItem`]; callers holding raw order JSON wrap it in
//! [`JsonLineItem`], which resolves each field through an ordered list of
//! source paths.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::measure::Dimensions;

/// The narrow interface the packer reads line items through.
pub trait PackableItem {
    /// Number of identical units. Defaults to 1 when unknown.
    fn quantity(&self) -> u32;

    /// Weight of one unit in grams, if known.
    fn weight_grams(&self) -> Option<f64>;

    /// Dimensions of one unit in centimetres, if all three sides are known.
    fn dimensions_cm(&self) -> Option<Dimensions>;
}

impl<T: PackableItem + ?Sized> PackableItem for &T {
    fn quantity(&self) -> u32 {
        (**self).quantity()
    }

    fn weight_grams(&self) -> Option<f64> {
        (**self).weight_grams()
    }

    fn dimensions_cm(&self) -> Option<Dimensions> {
        (**self).dimensions_cm()
    }
}

/// A typed line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub weight_grams: Option<f64>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

const fn default_quantity() -> u32 {
    1
}

impl LineItem {
    /// Create a line item.
    #[must_use]
    pub const fn new(quantity: u32, weight_grams: Option<f64>, dimensions: Option<Dimensions>) -> Self {
        Self {
            quantity,
            weight_grams,
            dimensions,
        }
    }
}

impl PackableItem for LineItem {
    fn quantity(&self) -> u32 {
        self.quantity
    }

    fn weight_grams(&self) -> Option<f64> {
        self.weight_grams.filter(|grams| is_weight(*grams))
    }

    fn dimensions_cm(&self) -> Option<Dimensions> {
        self.dimensions.filter(Dimensions::is_positive)
    }
}

// =============================================================================
// JSON adapter
// =============================================================================

/// Objects that may carry weight and dimensions, in precedence order.
///
/// The first source that yields a value wins. Dimensions are resolved as a
/// whole: a source only counts if it carries all three sides.
pub const ATTRIBUTE_SOURCES: &[&[&str]] = &[
    &["variant"],
    &["product"],
    &["line_item", "variant"],
    &["line_item", "product"],
];

/// Paths that may carry the quantity, in precedence order.
pub const QUANTITY_SOURCES: &[&[&str]] = &[&["quantity"], &["line_item", "quantity"]];

/// A line item read from untyped order JSON.
///
/// Order payloads disagree on where product attributes live: a cart line has
/// `variant.weight`, a fulfillment item has `line_item.variant.weight`, and a
/// product without variant overrides only has `product.weight`. Each accessor
/// walks [`ATTRIBUTE_SOURCES`] in order and returns the first value present.
/// Numbers encoded as strings (`"250"`) are accepted.
#[derive(Debug, Clone, Copy)]
pub struct JsonLineItem<'a>(pub &'a Value);

impl<'a> JsonLineItem<'a> {
    /// Wrap a JSON line item.
    #[must_use]
    pub const fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// The first source object (in precedence order) for which `read` yields
    /// a value.
    fn first_attribute<T>(&self, read: impl Fn(&Value) -> Option<T>) -> Option<T> {
        ATTRIBUTE_SOURCES
            .iter()
            .filter_map(|path| lookup(self.0, path))
            .find_map(read)
    }
}

impl PackableItem for JsonLineItem<'_> {
    fn quantity(&self) -> u32 {
        QUANTITY_SOURCES
            .iter()
            .filter_map(|path| lookup(self.0, path))
            .find_map(as_number)
            .filter(|qty| qty.is_finite() && *qty >= 0.0)
            .map_or(1, quantity_from_f64)
    }

    fn weight_grams(&self) -> Option<f64> {
        self.first_attribute(|source| {
            source
                .get("weight")
                .and_then(as_number)
                .filter(|grams| is_weight(*grams))
        })
    }

    fn dimensions_cm(&self) -> Option<Dimensions> {
        self.first_attribute(|source| {
            let side = |key: &str| source.get(key).and_then(as_number);
            Dimensions::positive(side("length")?, side("width")?, side("height")?)
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn quantity_from_f64(qty: f64) -> u32 {
    qty.trunc().min(f64::from(u32::MAX)) as u32
}

/// Walk `path` from `root`, returning `None` on a missing or `null` step.
fn lookup<'v>(root: &'v Value, path: &[&str]) -> Option<&'v Value> {
    path.iter()
        .try_fold(root, |node, key| node.get(key))
        .filter(|value| !value.is_null())
}

fn is_weight(grams: f64) -> bool {
    grams.is_finite() && grams >= 0.0
}

/// Read a JSON number or a numeric string.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}
