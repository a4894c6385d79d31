//! Carrier REST API client.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use parcelwise_core::{CapabilityEntry, ParcelTypeTier, ProductKey};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use super::auth::{CarrierToken, request_token};
use super::catalog::{CapabilitySource, RouteKey};
use super::{CarrierError, snippet};
use crate::config::CarrierConfig;

/// Carrier REST API client.
///
/// Cheap to clone; clones share the HTTP connection pool and the cached
/// access token.
#[derive(Clone)]
pub struct CarrierClient {
    inner: Arc<CarrierClientInner>,
}

struct CarrierClientInner {
    client: reqwest::Client,
    api_url: String,
    client_id: String,
    client_secret: SecretString,
    /// In-memory token cache
    token: RwLock<Option<CarrierToken>>,
}

/// Capability catalog response.
#[derive(Debug, Deserialize)]
struct CapabilitiesResponse {
    #[serde(default)]
    products: Vec<ProductCapabilities>,
}

#[derive(Debug, Deserialize)]
struct ProductCapabilities {
    key: ProductKey,
    #[serde(default)]
    parcel_types: Vec<ParcelTypeTier>,
}

impl CapabilitiesResponse {
    /// Flatten products into one row per (product, tier).
    fn into_entries(self) -> Vec<CapabilityEntry> {
        self.products
            .into_iter()
            .flat_map(|product| {
                let key = product.key;
                product
                    .parcel_types
                    .into_iter()
                    .map(move |parcel_type| CapabilityEntry {
                        product: key.clone(),
                        parcel_type,
                    })
            })
            .collect()
    }
}

impl CarrierClient {
    /// Create a new carrier API client without a token.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CarrierConfig) -> Result<Self, CarrierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(CarrierClientInner {
                client,
                api_url: config.api_url.trim_end_matches('/').to_string(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                token: RwLock::new(None),
            }),
        })
    }

    /// Clear the cached token.
    pub async fn clear_token(&self) {
        *self.inner.token.write().await = None;
    }

    /// A valid access token, requesting a new one if none is cached or the
    /// cached one is about to expire.
    async fn access_token(&self) -> Result<SecretString, CarrierError> {
        if let Some(token) = self.inner.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.clone());
        }

        let mut guard = self.inner.token.write().await;

        // Another task may have refreshed while we waited for the lock
        if let Some(token) = guard.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.clone());
        }

        debug!("Requesting carrier access token");
        let token_url = format!("{}/oauth/token", self.inner.api_url);
        let token = request_token(
            &self.inner.client,
            &token_url,
            &self.inner.client_id,
            &self.inner.client_secret,
        )
        .await?;
        let access_token = token.access_token.clone();
        *guard = Some(token);

        Ok(access_token)
    }

    /// Fetch the capability catalog for a route.
    ///
    /// # Errors
    ///
    /// Returns `CarrierError::RateLimited` on 429, `CarrierError::TokenExpired`
    /// (after clearing the cached token) on 401/403, and `CarrierError::Api`
    /// on any other non-success status.
    #[instrument(skip(self), fields(origin = %route.origin_country, destination = %route.destination_country, business = route.business))]
    pub async fn fetch_capabilities(
        &self,
        route: &RouteKey,
    ) -> Result<Vec<CapabilityEntry>, CarrierError> {
        let access_token = self.access_token().await?;

        let url = url::Url::parse_with_params(
            &format!("{}/capabilities", self.inner.api_url),
            &[
                ("origin", route.origin_country.as_str()),
                ("destination", route.destination_country.as_str()),
                ("business", if route.business { "true" } else { "false" }),
            ],
        )?;

        let response = self
            .inner
            .client
            .get(url)
            .bearer_auth(access_token.expose_secret())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CarrierError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            self.clear_token().await;
            return Err(CarrierError::TokenExpired);
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %snippet(&body),
                "Carrier capabilities request failed"
            );
            return Err(CarrierError::Api {
                status: status.as_u16(),
                message: snippet(&body),
            });
        }

        let parsed: CapabilitiesResponse = serde_json::from_str(&body)?;
        let entries = parsed.into_entries();
        debug!(rows = entries.len(), "Fetched capability catalog");

        Ok(entries)
    }
}

impl CapabilitySource for CarrierClient {
    fn fetch_capabilities<'a>(
        &'a self,
        route: &'a RouteKey,
    ) -> BoxFuture<'a, Result<Vec<CapabilityEntry>, CarrierError>> {
        Self::fetch_capabilities(self, route).boxed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_response_flattens_products() {
        let body = r#"{
            "products": [
                {
                    "key": "PARCEL",
                    "parcel_types": [
                        { "key": "SMALL", "min_weight_kg": 0, "max_weight_kg": 2,
                          "max_dimensions": { "length_cm": 35, "width_cm": 25, "height_cm": 10 },
                          "price": { "amount": "4.50", "currency": "EUR" } },
                        { "key": "LARGE", "max_weight_kg": 31.5 }
                    ]
                },
                { "key": "LETTER" }
            ]
        }"#;

        let parsed: CapabilitiesResponse = serde_json::from_str(body).unwrap();
        let entries = parsed.into_entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].product.as_str(), "PARCEL");
        assert_eq!(entries[0].parcel_type.key.as_str(), "SMALL");
        assert!(entries[0].parcel_type.max_dimensions.is_some());
        assert!(entries[0].parcel_type.price.is_some());
        assert_eq!(entries[1].parcel_type.key.as_str(), "LARGE");
        assert!(entries[1].parcel_type.min_weight_kg.abs() < f64::EPSILON);
    }

    #[test]
    fn test_capabilities_response_rejects_empty_tier_key() {
        let body = r#"{ "products": [ { "key": "PARCEL", "parcel_types": [ { "key": "", "max_weight_kg": 1 } ] } ] }"#;
        assert!(serde_json::from_str::<CapabilitiesResponse>(body).is_err());
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = CarrierConfig {
            api_url: "https://api.example.test/v1/".to_string(),
            client_id: "client".to_string(),
            client_secret: SecretString::from("secret"),
            catalog_ttl: Duration::from_secs(300),
        };
        let client = CarrierClient::new(&config).unwrap();
        assert_eq!(client.inner.api_url, "https://api.example.test/v1");
    }
}
