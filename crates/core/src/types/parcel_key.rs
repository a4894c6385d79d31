//! Carrier parcel-type key.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ParcelTypeKey`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParcelTypeKeyError {
    /// The input is empty or only whitespace.
    #[error("parcel type key cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("parcel type key must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains whitespace or control characters.
    #[error("parcel type key must not contain whitespace or control characters")]
    InvalidCharacter,
}

/// The identifier of a carrier parcel-type tier (e.g. `"SMALL"`, `"PARCEL"`).
///
/// A `ParcelTypeKey` is never empty, so a label request built from one always
/// names a tier.
///
/// ## Constraints
///
/// - Length: 1-64 characters after trimming surrounding whitespace
/// - No inner whitespace or control characters
///
/// ## Examples
///
/// ```
/// use parcelwise_core::ParcelTypeKey;
///
/// assert!(ParcelTypeKey::parse("SMALL").is_ok());
/// assert!(ParcelTypeKey::parse("  PARCEL ").is_ok()); // trimmed
///
/// assert!(ParcelTypeKey::parse("").is_err());
/// assert!(ParcelTypeKey::parse("   ").is_err());
/// assert!(ParcelTypeKey::parse("TWO WORDS").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ParcelTypeKey(String);

impl ParcelTypeKey {
    /// Maximum length of a parcel type key.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `ParcelTypeKey` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than 64
    /// characters, or contains whitespace or control characters.
    pub fn parse(s: &str) -> Result<Self, ParcelTypeKeyError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ParcelTypeKeyError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ParcelTypeKeyError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(ParcelTypeKeyError::InvalidCharacter);
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ParcelTypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ParcelTypeKey {
    type Err = ParcelTypeKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ParcelTypeKey {
    type Error = ParcelTypeKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ParcelTypeKey> for String {
    fn from(key: ParcelTypeKey) -> Self {
        key.0
    }
}

impl AsRef<str> for ParcelTypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
