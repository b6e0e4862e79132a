//! Service configuration
//!
//! Defines settings for the HTTP server, the upstream catalog, and caching.

use std::env;

/// Configuration for the fabric price service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to (default: 127.0.0.1:8080)
    pub bind_addr: String,
    /// Search endpoint of the upstream fabric catalog
    pub catalog_search_url: String,
    /// Label identifying the data source in responses
    pub supplier_name: String,
    /// Timeout for one catalog request in seconds (default: 10)
    pub fetch_timeout_secs: u64,
    /// Cache TTL in seconds (default: 3600 = 1 hour)
    pub cache_ttl_secs: u64,
    /// Maximum cache entries before eviction (default: 500)
    pub max_cache_entries: usize,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            bind_addr: env::var("API_BIND_ADDR").unwrap_or(defaults.bind_addr),
            catalog_search_url: env::var("CATALOG_SEARCH_URL")
                .unwrap_or(defaults.catalog_search_url),
            supplier_name: env::var("CATALOG_SUPPLIER_NAME").unwrap_or(defaults.supplier_name),
            fetch_timeout_secs: env::var("CATALOG_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_secs),
            cache_ttl_secs: env::var("PRICE_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl_secs),
            max_cache_entries: env::var("PRICE_CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_cache_entries),
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.catalog_search_url.is_empty() {
            return Err("catalog_search_url must not be empty".to_string());
        }
        if self.fetch_timeout_secs == 0 {
            return Err("fetch_timeout_secs must be at least 1".to_string());
        }
        if self.max_cache_entries == 0 {
            return Err("max_cache_entries must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            catalog_search_url: "https://www.mondialtissus.fr/recherche".to_string(),
            supplier_name: "Mondial Tissus".to_string(),
            fetch_timeout_secs: 10,
            cache_ttl_secs: 3600,
            max_cache_entries: 500,
        }
    }
}
