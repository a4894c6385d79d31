//! Configured packaging options.

use serde::{Deserialize, Serialize};

use super::id::BoxId;
use super::measure::Dimensions;

/// Errors raised when a box template violates its invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum BoxTemplateError {
    /// An interior side is zero, negative or not a number.
    #[error("box {id}: interior dimensions must be positive (got {length}x{width}x{height} cm)")]
    NonPositiveDimensions {
        id: String,
        length: f64,
        width: f64,
        height: f64,
    },
    /// The maximum payload weight is zero, negative or not a number.
    #[error("box {id}: max weight must be positive (got {max_weight_kg} kg)")]
    NonPositiveMaxWeight { id: String, max_weight_kg: f64 },
}

/// A named packaging option with interior dimensions and an optional payload
/// limit.
///
/// Box templates live in the settings store and are handed to the packer per
/// call. Every instance has strictly positive interior dimensions; both
/// [`BoxTemplate::new`] and deserialisation enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoxTemplate")]
pub struct BoxTemplate {
    pub id: BoxId,
    pub name: String,
    /// Interior dimensions in centimetres.
    pub dimensions: Dimensions,
    /// Maximum payload in kilograms; `None` means unlimited.
    pub max_weight_kg: Option<f64>,
}

impl BoxTemplate {
    /// Create a validated box template.
    ///
    /// # Errors
    ///
    /// Returns an error if any interior side is not strictly positive, or if
    /// `max_weight_kg` is given but not strictly positive.
    pub fn new(
        id: impl Into<BoxId>,
        name: impl Into<String>,
        dimensions: Dimensions,
        max_weight_kg: Option<f64>,
    ) -> Result<Self, BoxTemplateError> {
        let id = id.into();

        if !dimensions.is_positive() {
            return Err(BoxTemplateError::NonPositiveDimensions {
                id: id.into_inner(),
                length: dimensions.length_cm,
                width: dimensions.width_cm,
                height: dimensions.height_cm,
            });
        }

        if let Some(max) = max_weight_kg
            && !(max.is_finite() && max > 0.0)
        {
            return Err(BoxTemplateError::NonPositiveMaxWeight {
                id: id.into_inner(),
                max_weight_kg: max,
            });
        }

        Ok(Self {
            id,
            name: name.into(),
            dimensions,
            max_weight_kg,
        })
    }

    /// Interior volume in cubic centimetres.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.dimensions.volume()
    }

    /// Returns `true` if `weight_kg` stays within the payload limit.
    #[must_use]
    pub fn accepts_weight(&self, weight_kg: f64) -> bool {
        self.max_weight_kg
            .is_none_or(|max| super::measure::within_limit(weight_kg, max))
    }
}

/// Settings-store shape of a box template, before validation.
///
/// Dimensions are stored flat (`length`, `width`, `height`); the nested
/// `dimensions` form is accepted as well.
#[derive(Deserialize)]
struct RawBoxTemplate {
    id: BoxId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    dimensions: Option<Dimensions>,
    #[serde(default, alias = "length_cm")]
    length: Option<f64>,
    #[serde(default, alias = "width_cm")]
    width: Option<f64>,
    #[serde(default, alias = "height_cm")]
    height: Option<f64>,
    #[serde(default, alias = "max_weight")]
    max_weight_kg: Option<f64>,
}

impl TryFrom<RawBoxTemplate> for BoxTemplate {
    type Error = BoxTemplateError;

    fn try_from(raw: RawBoxTemplate) -> Result<Self, Self::Error> {
        let dimensions = raw.dimensions.unwrap_or_else(|| {
            Dimensions::new(
                raw.length.unwrap_or(0.0),
                raw.width.unwrap_or(0.0),
                raw.height.unwrap_or(0.0),
            )
        });
        let name = raw.name.unwrap_or_else(|| raw.id.to_string());
        Self::new(raw.id, name, dimensions, raw.max_weight_kg)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let bx = BoxTemplate::new("small", "Small", Dimensions::new(20.0, 15.0, 10.0), Some(5.0))
            .unwrap();
        assert!((bx.volume() - 3000.0).abs() < 1e-9);
        assert!(bx.accepts_weight(5.0));
        assert!(!bx.accepts_weight(5.1));
    }

    #[test]
    fn test_new_rejects_zero_side() {
        let err = BoxTemplate::new("flat", "Flat", Dimensions::new(20.0, 0.0, 10.0), None)
            .unwrap_err();
        assert!(matches!(err, BoxTemplateError::NonPositiveDimensions { .. }));
    }

    #[test]
    fn test_new_rejects_negative_max_weight() {
        let err = BoxTemplate::new("neg", "Neg", Dimensions::new(1.0, 1.0, 1.0), Some(-1.0))
            .unwrap_err();
        assert!(matches!(err, BoxTemplateError::NonPositiveMaxWeight { .. }));
    }

    #[test]
    fn test_unlimited_weight() {
        let bx = BoxTemplate::new("big", "Big", Dimensions::new(1.0, 1.0, 1.0), None).unwrap();
        assert!(bx.accepts_weight(1_000.0));
    }

    #[test]
    fn test_deserialize_flat_settings_shape() {
        let bx: BoxTemplate = serde_json::from_str(
            r#"{"id":"box_m","name":"Medium","length":30,"width":20,"height":15,"max_weight":10}"#,
        )
        .unwrap();
        assert_eq!(bx.id.as_str(), "box_m");
        assert_eq!(bx.dimensions, Dimensions::new(30.0, 20.0, 15.0));
        assert_eq!(bx.max_weight_kg, Some(10.0));
    }

    #[test]
    fn test_deserialize_nested_dimensions() {
        let bx: BoxTemplate = serde_json::from_str(
            r#"{"id":"box_s","dimensions":{"length_cm":10,"width_cm":10,"height_cm":10}}"#,
        )
        .unwrap();
        assert_eq!(bx.name, "box_s");
        assert_eq!(bx.max_weight_kg, None);
    }

    #[test]
    fn test_deserialize_rejects_missing_dimensions() {
        let parsed: Result<BoxTemplate, _> = serde_json::from_str(r#"{"id":"nope"}"#);
        assert!(parsed.is_err());
    }
}
