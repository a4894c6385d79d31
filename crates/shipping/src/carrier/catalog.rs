//! Route-keyed capability catalog with a fixed TTL.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use moka::future::Cache;
use parcelwise_core::CapabilityEntry;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::CarrierError;

/// Origin, destination and business flag the carrier prices a catalog for.
///
/// Country codes are normalised to trimmed upper case, so `"de"` and `"DE "`
/// share a cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRouteKey")]
pub struct RouteKey {
    pub origin_country: String,
    pub destination_country: String,
    pub business: bool,
}

#[derive(Deserialize)]
struct RawRouteKey {
    origin_country: String,
    destination_country: String,
    #[serde(default)]
    business: bool,
}

impl From<RawRouteKey> for RouteKey {
    fn from(raw: RawRouteKey) -> Self {
        Self::new(&raw.origin_country, &raw.destination_country, raw.business)
    }
}

impl RouteKey {
    /// Create a normalised route key.
    #[must_use]
    pub fn new(origin_country: &str, destination_country: &str, business: bool) -> Self {
        Self {
            origin_country: origin_country.trim().to_uppercase(),
            destination_country: destination_country.trim().to_uppercase(),
            business,
        }
    }
}

/// Something that can produce the capability catalog for a route.
pub trait CapabilitySource: Send + Sync {
    /// Fetch every (product, tier) row offered on `route`.
    fn fetch_capabilities<'a>(
        &'a self,
        route: &'a RouteKey,
    ) -> BoxFuture<'a, Result<Vec<CapabilityEntry>, CarrierError>>;
}

/// A fixed catalog, the same for every route.
///
/// Used for offline planning and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog(pub Vec<CapabilityEntry>);

impl CapabilitySource for StaticCatalog {
    fn fetch_capabilities<'a>(
        &'a self,
        _route: &'a RouteKey,
    ) -> BoxFuture<'a, Result<Vec<CapabilityEntry>, CarrierError>> {
        let entries = self.0.clone();
        async move { Ok(entries) }.boxed()
    }
}

/// Capability catalog snapshots cached per route.
///
/// Concurrent lookups of the same route wait on a single fetch. Failed
/// fetches are not cached.
#[derive(Clone)]
pub struct CapabilityCatalog {
    source: Arc<dyn CapabilitySource>,
    cache: Cache<RouteKey, Arc<[CapabilityEntry]>>,
}

impl CapabilityCatalog {
    /// Wrap `source` in a cache whose entries live for `ttl`.
    #[must_use]
    pub fn new(source: Arc<dyn CapabilitySource>, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(256)
            .time_to_live(ttl)
            .build();

        Self { source, cache }
    }

    /// The catalog snapshot for `route`, fetched on a cache miss.
    ///
    /// # Errors
    ///
    /// Returns the fetch error (shared between concurrent callers) if the
    /// catalog was not cached and could not be fetched.
    #[instrument(skip(self), fields(origin = %route.origin_country, destination = %route.destination_country))]
    pub async fn capabilities(
        &self,
        route: &RouteKey,
    ) -> Result<Arc<[CapabilityEntry]>, Arc<CarrierError>> {
        self.cache
            .try_get_with(route.clone(), async {
                debug!("Capability catalog cache miss");
                self.source
                    .fetch_capabilities(route)
                    .await
                    .map(Arc::from)
            })
            .await
    }

    /// Drop the cached snapshot for `route`.
    pub async fn invalidate(&self, route: &RouteKey) {
        self.cache.invalidate(route).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parcelwise_core::{ParcelTypeKey, ParcelTypeTier, ProductKey};

    use super::*;

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CapabilitySource for CountingSource {
        fn fetch_capabilities<'a>(
            &'a self,
            _route: &'a RouteKey,
        ) -> BoxFuture<'a, Result<Vec<CapabilityEntry>, CarrierError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let fail = self.fail;
            async move {
                if fail {
                    return Err(CarrierError::RateLimited(5));
                }
                Ok(vec![CapabilityEntry {
                    product: ProductKey::new("PARCEL"),
                    parcel_type: ParcelTypeTier {
                        key: ParcelTypeKey::parse("SMALL").unwrap(),
                        min_weight_kg: 0.0,
                        max_weight_kg: 2.0,
                        max_dimensions: None,
                        price: None,
                    },
                }])
            }
            .boxed()
        }
    }

    fn counting(fail: bool) -> Arc<CountingSource> {
        Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    #[test]
    fn test_route_key_normalised() {
        assert_eq!(RouteKey::new(" de", "nl ", false), RouteKey::new("DE", "NL", false));
    }

    #[test]
    fn test_route_key_deserialize_defaults_business() {
        let route: RouteKey =
            serde_json::from_str(r#"{"origin_country":"de","destination_country":"at"}"#).unwrap();
        assert_eq!(route, RouteKey::new("DE", "AT", false));
    }

    #[tokio::test]
    async fn test_fetches_once_per_route_within_ttl() {
        let source = counting(false);
        let catalog = CapabilityCatalog::new(source.clone(), Duration::from_secs(300));
        let route = RouteKey::new("DE", "NL", false);

        let first = catalog.capabilities(&route).await.unwrap();
        let second = catalog.capabilities(&route).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_routes_cached_separately() {
        let source = counting(false);
        let catalog = CapabilityCatalog::new(source.clone(), Duration::from_secs(300));

        catalog.capabilities(&RouteKey::new("DE", "NL", false)).await.unwrap();
        catalog.capabilities(&RouteKey::new("DE", "NL", true)).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let source = counting(false);
        let catalog = CapabilityCatalog::new(source.clone(), Duration::from_secs(300));
        let route = RouteKey::new("DE", "NL", false);

        catalog.capabilities(&route).await.unwrap();
        catalog.invalidate(&route).await;
        catalog.capabilities(&route).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let source = counting(true);
        let catalog = CapabilityCatalog::new(source.clone(), Duration::from_secs(300));
        let route = RouteKey::new("DE", "NL", false);

        assert!(catalog.capabilities(&route).await.is_err());
        assert!(catalog.capabilities(&route).await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_static_catalog_ignores_route() {
        let catalog = StaticCatalog(Vec::new());
        let entries = catalog
            .fetch_capabilities(&RouteKey::new("DE", "US", true))
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}
