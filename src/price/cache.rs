//! TTL cache for price lookup results
//!
//! Keeps one entry per normalized query; staleness is evaluated lazily at
//! read time.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::price::types::{PriceQuery, PriceResult};

#[derive(Debug, Clone)]
struct CacheEntry {
    result: PriceResult,
    stored_at: Instant,
}

/// Cache statistics
#[derive(Debug)]
pub struct PriceCacheStats {
    pub total: usize,
    pub stale: usize,
    pub max: usize,
}

/// In-memory price cache with TTL-based expiry
pub struct PriceCache {
    entries: RwLock<HashMap<PriceQuery, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl PriceCache {
    /// Create a new cache
    ///
    /// # Arguments
    /// * `ttl_secs` - Time-to-live for entries in seconds
    /// * `max_entries` - Maximum number of entries before eviction
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
            max_entries,
        }
    }

    /// Get the cached result for a key, unless stale
    pub fn get(&self, key: &PriceQuery) -> Option<PriceResult> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;

        if entry.stored_at.elapsed() >= self.ttl {
            return None; // Stale, treated as absent
        }

        Some(entry.result.clone())
    }

    /// Insert a result, replacing any previous entry for the key
    ///
    /// Overwrites unconditionally; a second insert before expiry simply
    /// restarts the TTL.
    pub fn insert(&self, key: &PriceQuery, result: PriceResult) {
        let mut entries = match self.entries.write() {
            Ok(e) => e,
            Err(_) => return,
        };

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            Self::evict_oldest(&mut entries);
        }

        entries.insert(
            key.clone(),
            CacheEntry {
                result,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop all entries
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// Get cache statistics
    pub fn stats(&self) -> PriceCacheStats {
        let entries = match self.entries.read() {
            Ok(e) => e,
            Err(_) => {
                return PriceCacheStats {
                    total: 0,
                    stale: 0,
                    max: self.max_entries,
                }
            }
        };
        let total = entries.len();
        let stale = entries
            .values()
            .filter(|e| e.stored_at.elapsed() >= self.ttl)
            .count();
        PriceCacheStats {
            total,
            stale,
            max: self.max_entries,
        }
    }

    fn evict_oldest(entries: &mut HashMap<PriceQuery, CacheEntry>) {
        if let Some(oldest_key) = entries
            .iter()
            .min_by_key(|(_, v)| v.stored_at)
            .map(|(k, _)| k.clone())
        {
            entries.remove(&oldest_key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn result_for(fabric: &str, price: f64) -> PriceResult {
        PriceResult {
            fabric: fabric.to_string(),
            average_price: price,
            supplier: "Mondial Tissus".to_string(),
            observed_at: Utc::now(),
        }
    }

    fn key(raw: &str) -> PriceQuery {
        PriceQuery::parse(raw).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let cache = PriceCache::new(3600, 100);
        cache.insert(&key("lin"), result_for("lin", 12.5));

        let result = cache.get(&key("lin")).unwrap();
        assert_eq!(result.average_price, 12.5);
        assert_eq!(result.fabric, "lin");
    }

    #[test]
    fn test_stale_entry_is_absent() {
        // Zero TTL: every entry is stale the moment it lands
        let cache = PriceCache::new(0, 100);
        cache.insert(&key("lin"), result_for("lin", 12.5));

        assert!(cache.get(&key("lin")).is_none());
        assert_eq!(cache.stats().stale, 1);
    }

    #[test]
    fn test_normalized_keys_share_entry() {
        let cache = PriceCache::new(3600, 100);
        cache.insert(&key("  Cotton "), result_for("cotton", 8.0));

        assert!(cache.get(&key("cotton")).is_some());
        assert!(cache.get(&key("COTTON")).is_some());
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = PriceCache::new(3600, 100);
        cache.insert(&key("lin"), result_for("lin", 12.5));
        cache.insert(&key("lin"), result_for("lin", 13.0));

        assert_eq!(cache.get(&key("lin")).unwrap().average_price, 13.0);
        assert_eq!(cache.stats().total, 1);
    }

    #[test]
    fn test_max_entries_eviction() {
        let cache = PriceCache::new(3600, 3);
        for i in 0..5 {
            cache.insert(&key(&format!("fabric{}", i)), result_for("f", i as f64));
        }

        assert!(cache.stats().total <= 3);
    }

    #[test]
    fn test_clear() {
        let cache = PriceCache::new(3600, 100);
        cache.insert(&key("lin"), result_for("lin", 12.5));

        cache.clear();
        assert!(cache.get(&key("lin")).is_none());
        assert_eq!(cache.stats().total, 0);
    }
}
