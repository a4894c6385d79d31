//! Carrier authentication.
//!
//! Exchanges the configured client credentials for a short-lived bearer token.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use super::{CarrierError, snippet};

/// Seconds before expiry at which a token is treated as expired.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Bearer token obtained from the carrier's token endpoint.
#[derive(Debug, Clone)]
pub struct CarrierToken {
    /// Access token for API requests.
    pub access_token: SecretString,
    /// Unix timestamp when the access token expires.
    pub expires_at: i64,
}

/// Response from the token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds.
    expires_in: i64,
}

/// Error body from the token endpoint.
#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Request a token with the client-credentials grant.
///
/// # Errors
///
/// Returns `CarrierError::AuthenticationFailed` if the credentials are
/// rejected, or `CarrierError::Http` if the request fails.
#[instrument(skip(client, client_secret), fields(client_id = %client_id))]
pub async fn request_token(
    client: &reqwest::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &SecretString,
) -> Result<CarrierToken, CarrierError> {
    let now = chrono::Utc::now().timestamp();

    let response = client
        .post(token_url)
        .form(&[
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret.expose_secret()),
        ])
        .send()
        .await?;

    let status = response.status();

    if status.is_success() {
        let token: TokenResponse = response.json().await?;

        Ok(CarrierToken {
            access_token: SecretString::from(token.access_token),
            expires_at: now + token.expires_in,
        })
    } else if status == reqwest::StatusCode::BAD_REQUEST
        || status == reqwest::StatusCode::UNAUTHORIZED
        || status == reqwest::StatusCode::FORBIDDEN
    {
        let error_response: TokenErrorResponse =
            response.json().await.unwrap_or(TokenErrorResponse {
                error: None,
                error_description: None,
            });

        let message = error_response
            .error_description
            .or(error_response.error)
            .unwrap_or_else(|| "Invalid client credentials".to_string());

        Err(CarrierError::AuthenticationFailed(message))
    } else {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        Err(CarrierError::AuthenticationFailed(format!(
            "HTTP {status}: {}",
            snippet(&error_text)
        )))
    }
}

impl CarrierToken {
    /// Check if the access token has expired (or is about to).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_within(EXPIRY_MARGIN_SECS)
    }

    /// Check if the access token will expire within the given number of seconds.
    #[must_use]
    pub fn expires_within(&self, seconds: i64) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - seconds
    }
}
