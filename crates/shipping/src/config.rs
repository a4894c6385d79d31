//! Shipping service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CARRIER_CLIENT_ID` - Carrier API OAuth client ID
//! - `CARRIER_CLIENT_SECRET` - Carrier API OAuth client secret
//!
//! ## Optional
//! - `SHIPPING_HOST` - Bind address (default: 127.0.0.1)
//! - `SHIPPING_PORT` - Listen port (default: 3002)
//! - `CARRIER_API_URL` - Carrier API base URL (default: sandbox)
//! - `CARRIER_CATALOG_TTL_SECS` - Capability catalog cache TTL (default: 300)
//! - `CARRIER_DEFAULT_PARCEL_TYPE` - Tier used when no catalog tier fits (default: PARCEL)
//! - `CARRIER_DEFAULT_PRODUCT` - Shipping product used when a request names none
//! - `PARCELWISE_LOG_JSON` - Emit JSON logs when set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry traces sample rate (default: 0.1)

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use parcelwise_core::{ParcelTypeKey, ProductKey};
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_API_URL: &str = "https://api-sandbox.carrier.example/v1";
const DEFAULT_CATALOG_TTL_SECS: u64 = 300;
const DEFAULT_PARCEL_TYPE: &str = "PARCEL";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Shipping service configuration.
#[derive(Debug, Clone)]
pub struct ShippingConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Carrier API configuration
    pub carrier: CarrierConfig,
    /// Tier selection defaults
    pub planning: PlanningConfig,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Carrier API configuration.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct CarrierConfig {
    /// API base URL, without trailing slash
    pub api_url: String,
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// How long a fetched capability catalog is reused
    pub catalog_ttl: Duration,
}

impl std::fmt::Debug for CarrierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CarrierConfig")
            .field("api_url", &self.api_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("catalog_ttl", &self.catalog_ttl)
            .finish()
    }
}

/// Defaults applied when a request leaves tier selection open.
#[derive(Debug, Clone)]
pub struct PlanningConfig {
    /// Last link of the tier fallback chain
    pub default_parcel_type: ParcelTypeKey,
    /// Shipping product used when a request names none
    pub default_product: Option<ProductKey>,
}

impl ShippingConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("SHIPPING_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHIPPING_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("SHIPPING_PORT", "3002")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SHIPPING_PORT".to_string(), e.to_string()))?;

        let carrier = CarrierConfig::from_env()?;
        let planning = PlanningConfig::from_env()?;
        let log_json = get_optional_env("PARCELWISE_LOG_JSON").is_some();
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            host,
            port,
            carrier,
            planning,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CarrierConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_url = get_env_or_default("CARRIER_API_URL", DEFAULT_API_URL);
        url::Url::parse(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CARRIER_API_URL".to_string(), e.to_string()))?;

        let ttl_secs = get_optional_env("CARRIER_CATALOG_TTL_SECS")
            .map(|s| {
                s.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("CARRIER_CATALOG_TTL_SECS".to_string(), e.to_string())
                })
            })
            .transpose()?
            .unwrap_or(DEFAULT_CATALOG_TTL_SECS);

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client_id: get_required_env("CARRIER_CLIENT_ID")?,
            client_secret: get_validated_secret("CARRIER_CLIENT_SECRET")?,
            catalog_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

impl PlanningConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let default_parcel_type =
            ParcelTypeKey::parse(&get_env_or_default("CARRIER_DEFAULT_PARCEL_TYPE", DEFAULT_PARCEL_TYPE))
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("CARRIER_DEFAULT_PARCEL_TYPE".to_string(), e.to_string())
                })?;
        let default_product = get_optional_env("CARRIER_DEFAULT_PRODUCT")
            .filter(|s| !s.trim().is_empty())
            .map(|s| ProductKey::new(s.trim()));

        Ok(Self {
            default_parcel_type,
            default_product,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-client-secret", "TEST_VAR");
        assert!(matches!(result.unwrap_err(), ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result.unwrap_err(), ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ShippingConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3002,
            carrier: CarrierConfig {
                api_url: DEFAULT_API_URL.to_string(),
                client_id: "client".to_string(),
                client_secret: SecretString::from("s3cr3t"),
                catalog_ttl: Duration::from_secs(DEFAULT_CATALOG_TTL_SECS),
            },
            planning: PlanningConfig {
                default_parcel_type: ParcelTypeKey::parse(DEFAULT_PARCEL_TYPE).unwrap(),
                default_product: None,
            },
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3002);
    }

    #[test]
    fn test_carrier_config_debug_redacts_secrets() {
        let config = CarrierConfig {
            api_url: DEFAULT_API_URL.to_string(),
            client_id: "client_123".to_string(),
            client_secret: SecretString::from("super_secret_client_secret"),
            catalog_ttl: Duration::from_secs(60),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("client_123"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_client_secret"));
    }

    #[test]
    fn test_default_parcel_type_is_valid() {
        assert!(ParcelTypeKey::parse(DEFAULT_PARCEL_TYPE).is_ok());
    }
}
