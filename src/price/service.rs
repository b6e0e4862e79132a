//! Lookup coordination
//!
//! Orchestrates cache reads, catalog fetches, and cache writes, and coalesces
//! concurrent lookups for the same key into a single upstream fetch.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::price::cache::{PriceCache, PriceCacheStats};
use crate::price::extractor::extract_average_price;
use crate::price::fetcher::CatalogClient;
use crate::price::types::{LookupError, PriceQuery, PriceResult};

type LookupOutcome = Result<PriceResult, LookupError>;
type FlightRegistry = HashMap<PriceQuery, watch::Receiver<Option<LookupOutcome>>>;

/// Coordinates price lookups against the cache and the upstream catalog
///
/// At most one fetch is in flight per normalized key: the first cache-missing
/// caller registers a watch channel and spawns the fetch, later arrivals
/// subscribe to the same channel and receive the identical outcome. The fetch
/// runs on a detached task, so a caller timing out or disconnecting never
/// aborts a fetch that others have joined.
pub struct PriceLookupService {
    client: Arc<dyn CatalogClient>,
    cache: Arc<PriceCache>,
    in_flight: Arc<Mutex<FlightRegistry>>,
}

impl PriceLookupService {
    pub fn new(client: Arc<dyn CatalogClient>, config: &ServiceConfig) -> Self {
        Self {
            client,
            cache: Arc::new(PriceCache::new(
                config.cache_ttl_secs,
                config.max_cache_entries,
            )),
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Look up the representative price for a free-text fabric name
    pub async fn lookup(&self, raw_query: &str) -> LookupOutcome {
        let key = PriceQuery::parse(raw_query)?;

        if let Some(result) = self.cache.get(&key) {
            debug!("Price cache hit for: {}", key);
            return Ok(result);
        }

        // Atomic check-then-register: either join the in-flight fetch for
        // this key or become the one that starts it.
        let (lead_tx, mut rx) = {
            let mut registry = lock_registry(&self.in_flight);
            if let Some(rx) = registry.get(&key) {
                debug!("Joining in-flight fetch for: {}", key);
                (None, rx.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                registry.insert(key.clone(), rx.clone());
                (Some(tx), rx)
            }
        };

        if let Some(tx) = lead_tx {
            self.spawn_fetch(key, tx);
        }

        let resolved = rx
            .wait_for(|outcome| outcome.is_some())
            .await
            .map_err(|_| {
                LookupError::Internal("price fetch task dropped without resolving".to_string())
            })?;
        (*resolved)
            .clone()
            .ok_or_else(|| LookupError::Internal("unresolved fetch outcome".to_string()))?
    }

    /// Run the fetch+extract cycle on a detached task and broadcast its outcome
    fn spawn_fetch(&self, key: PriceQuery, tx: watch::Sender<Option<LookupOutcome>>) {
        let client = Arc::clone(&self.client);
        let cache = Arc::clone(&self.cache);
        let in_flight = Arc::clone(&self.in_flight);

        tokio::spawn(async move {
            let outcome = fetch_and_extract(client.as_ref(), &key).await;

            match &outcome {
                Ok(result) => {
                    // Populate the cache before deregistering, so a caller
                    // arriving in between hits the cache instead of starting
                    // a redundant fetch.
                    cache.insert(&key, result.clone());
                    info!("Fetched price for {}: {}", key, result.average_price);
                }
                Err(e) => {
                    // Failures are never cached; the next lookup retries.
                    warn!("Price lookup for {} failed: {}", key, e);
                }
            }

            lock_registry(&in_flight).remove(&key);
            let _ = tx.send(Some(outcome));
        });
    }

    /// Look up several fabrics concurrently
    ///
    /// Lookups that normalize to the same key still share one fetch.
    pub async fn lookup_many(&self, raw_queries: &[String]) -> Vec<LookupOutcome> {
        let lookups: Vec<_> = raw_queries.iter().map(|q| self.lookup(q)).collect();
        futures::future::join_all(lookups).await
    }

    /// Cache statistics
    pub fn cache_stats(&self) -> PriceCacheStats {
        self.cache.stats()
    }

    /// Drop all cached prices
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

/// One fetch cycle: catalog page → extracted average → timestamped result
async fn fetch_and_extract(client: &dyn CatalogClient, key: &PriceQuery) -> LookupOutcome {
    let html = client.search_page(key.as_str()).await?;
    let average_price = extract_average_price(&html)?;

    Ok(PriceResult {
        fabric: key.as_str().to_string(),
        average_price,
        supplier: client.supplier().to_string(),
        observed_at: Utc::now(),
    })
}

// The registry mutex is only held for map operations, never across an await.
// A poisoned lock would mean a panic inside one of those map operations; the
// map itself is still usable, so recover the guard instead of propagating.
fn lock_registry(registry: &Mutex<FlightRegistry>) -> MutexGuard<'_, FlightRegistry> {
    match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
