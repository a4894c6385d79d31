//! Carrier REST API client.
//!
//! Provides the two carrier calls the planner depends on: an OAuth-style
//! access token, and the capability catalog listing the parcel-type tiers
//! offered on a route.
//!
//! # Architecture
//!
//! - Client-credentials authentication; the token is cached in memory and
//!   fetched again shortly before it expires
//! - Capability catalog cached per route with a fixed TTL via `moka`
//! - [`CapabilitySource`] abstracts the catalog fetch so the cache and the
//!   HTTP handlers can run against a static catalog in tests and in the CLI

pub mod auth;
pub mod catalog;
pub mod client;

pub use auth::CarrierToken;
pub use catalog::{CapabilityCatalog, CapabilitySource, RouteKey, StaticCatalog};
pub use client::CarrierClient;

use thiserror::Error;

/// Errors that can occur when interacting with the carrier API.
#[derive(Debug, Error)]
pub enum CarrierError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured API URL cannot be used to build a request URL.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The carrier answered with a non-success status.
    #[error("Carrier API returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// First part of the response body.
        message: String,
    },

    /// Rate limited by the carrier.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed (invalid client credentials).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The carrier rejected the access token.
    #[error("Access token expired")]
    TokenExpired,
}

/// Truncate a response body for error messages and logs.
pub(crate) fn snippet(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_carrier_error_display() {
        let err = CarrierError::Api {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Carrier API returned 503: maintenance");
    }

    #[test]
    fn test_rate_limited_error() {
        let err = CarrierError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }

    #[test]
    fn test_token_expired_error() {
        assert_eq!(CarrierError::TokenExpired.to_string(), "Access token expired");
    }

    #[test]
    fn test_authentication_failed_error() {
        let err = CarrierError::AuthenticationFailed("invalid_client".to_string());
        assert_eq!(err.to_string(), "Authentication failed: invalid_client");
    }

    #[test]
    fn test_snippet_truncates() {
        assert_eq!(snippet(&"x".repeat(500)).len(), 200);
        assert_eq!(snippet("short"), "short");
    }
}
