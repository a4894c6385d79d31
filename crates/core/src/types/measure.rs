//! Geometry and weight helpers shared by packing and parcel-type selection.
//!
//! All lengths are centimetres, all volumes cubic centimetres and all weights
//! kilograms unless a name says otherwise (`*_grams`).

use serde::{Deserialize, Serialize};

/// Tolerance for weight and size comparisons.
///
/// Accumulated `f64` sums drift (`0.1 + 0.2 > 0.3`), and an exact fit must
/// never be rejected because of it.
pub const EPSILON: f64 = 1e-9;

/// Returns `true` if `value` does not exceed `limit` (within [`EPSILON`]).
#[must_use]
pub fn within_limit(value: f64, limit: f64) -> bool {
    value <= limit + EPSILON
}

/// Returns `true` if `value` lies in the inclusive range `[min, max]`.
#[must_use]
pub fn within_range(value: f64, min: f64, max: f64) -> bool {
    value + EPSILON >= min && within_limit(value, max)
}

/// Returns `true` if `a` and `b` are equal within [`EPSILON`].
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= EPSILON
}

/// Convert grams to kilograms.
#[must_use]
pub fn grams_to_kg(grams: f64) -> f64 {
    grams / 1000.0
}

/// Convert kilograms to whole grams, rounding up.
///
/// Carriers reject zero-weight parcels, so the result is at least 1.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn kg_to_billable_grams(kg: f64) -> u32 {
    let grams = (kg * 1000.0 - EPSILON).ceil();
    if grams.is_finite() && grams >= 1.0 {
        grams.min(f64::from(u32::MAX)) as u32
    } else {
        1
    }
}

/// Length, width and height of a unit or box interior, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub length_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
}

impl Dimensions {
    /// Create dimensions without validation.
    #[must_use]
    pub const fn new(length_cm: f64, width_cm: f64, height_cm: f64) -> Self {
        Self {
            length_cm,
            width_cm,
            height_cm,
        }
    }

    /// Create dimensions only if every side is finite and strictly positive.
    #[must_use]
    pub fn positive(length_cm: f64, width_cm: f64, height_cm: f64) -> Option<Self> {
        let dims = Self::new(length_cm, width_cm, height_cm);
        dims.is_positive().then_some(dims)
    }

    /// Returns `true` if every side is finite and strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.as_array()
            .iter()
            .all(|side| side.is_finite() && *side > 0.0)
    }

    /// Volume in cubic centimetres.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.length_cm * self.width_cm * self.height_cm
    }

    /// The three sides as `[length, width, height]`.
    #[must_use]
    pub const fn as_array(&self) -> [f64; 3] {
        [self.length_cm, self.width_cm, self.height_cm]
    }

    /// The three sides sorted ascending.
    #[must_use]
    pub fn sorted(&self) -> [f64; 3] {
        let mut sides = self.as_array();
        sides.sort_by(f64::total_cmp);
        sides
    }

    /// Returns `true` if `self` fits inside `container` in some axis-aligned
    /// orientation.
    ///
    /// Both triples are sorted ascending and compared side by side, so the
    /// order in which the sides were recorded does not matter.
    #[must_use]
    pub fn fits_within(&self, container: &Self) -> bool {
        self.sorted()
            .iter()
            .zip(container.sorted().iter())
            .all(|(side, limit)| within_limit(*side, *limit))
    }

    /// Componentwise maximum of two sets of dimensions (no sorting).
    #[must_use]
    pub fn max_components(&self, other: &Self) -> Self {
        Self::new(
            self.length_cm.max(other.length_cm),
            self.width_cm.max(other.width_cm),
            self.height_cm.max(other.height_cm),
        )
    }

    /// Componentwise maximum of the sorted triples of two sets of dimensions.
    #[must_use]
    pub fn max_sorted(&self, other: &Self) -> Self {
        let [a0, a1, a2] = self.sorted();
        let [b0, b1, b2] = other.sorted();
        Self::new(a0.max(b0), a1.max(b1), a2.max(b2))
    }
}
