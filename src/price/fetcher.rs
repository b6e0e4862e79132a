//! HTTP fetching of catalog search pages
//!
//! Retrieves the raw HTML of the upstream catalog's search results for a
//! fabric query. This is the one component that touches the network.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::ServiceConfig;
use crate::price::types::LookupError;

// The catalog rejects requests without a browser identity and a matching
// locale, so these headers are required, not cosmetic.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE_FR: &str = "fr,fr-FR;q=0.8,en-US;q=0.5,en;q=0.3";

/// Source of catalog search pages
///
/// The seam between the lookup coordinator and the outside world; tests swap
/// in canned implementations.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch the raw HTML of the search page for `query`
    async fn search_page(&self, query: &str) -> Result<String, LookupError>;

    /// Label of the data source, reported in lookup results
    fn supplier(&self) -> &str;
}

/// Catalog client backed by an HTTP GET against the configured search endpoint
pub struct HttpCatalogClient {
    client: Client,
    search_url: String,
    supplier_name: String,
}

impl HttpCatalogClient {
    pub fn new(config: &ServiceConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_FR));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            search_url: config.catalog_search_url.clone(),
            supplier_name: config.supplier_name.clone(),
        }
    }

    /// Build the search URL with the query form-encoded into the `q` parameter
    fn search_url_for(&self, query: &str) -> Result<Url, LookupError> {
        Url::parse_with_params(&self.search_url, &[("q", query)]).map_err(|e| {
            LookupError::Internal(format!("invalid catalog search URL: {}", e))
        })
    }
}

#[async_trait]
impl CatalogClient for HttpCatalogClient {
    async fn search_page(&self, query: &str) -> Result<String, LookupError> {
        let url = self.search_url_for(query)?;
        debug!("Fetching catalog page: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            let message = if e.is_timeout() {
                format!("timed out fetching catalog page: {}", e)
            } else {
                e.to_string()
            };
            LookupError::Fetch {
                status: None,
                message,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Fetch {
                status: Some(status.as_u16()),
                message: format!("catalog returned HTTP {}", status.as_u16()),
            });
        }

        response.text().await.map_err(|e| LookupError::Fetch {
            status: None,
            message: e.to_string(),
        })
    }

    fn supplier(&self) -> &str {
        &self.supplier_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_query() {
        let client = HttpCatalogClient::new(&ServiceConfig::default());

        let url = client.search_url_for("soie rouge").unwrap();
        assert!(url.as_str().starts_with("https://www.mondialtissus.fr/recherche?"));
        assert_eq!(url.query(), Some("q=soie+rouge"));
    }

    #[test]
    fn test_search_url_encodes_special_chars() {
        let client = HttpCatalogClient::new(&ServiceConfig::default());

        let url = client.search_url_for("crêpe & satin").unwrap();
        assert!(url.query().unwrap().contains("q=cr%C3%AApe+%26+satin"));
    }

    #[test]
    fn test_supplier_label_comes_from_config() {
        let mut config = ServiceConfig::default();
        config.supplier_name = "Test Supplier".to_string();

        let client = HttpCatalogClient::new(&config);
        assert_eq!(client.supplier(), "Test Supplier");
    }

    #[test]
    fn test_invalid_search_url_is_internal_error() {
        let mut config = ServiceConfig::default();
        config.catalog_search_url = "not a url".to_string();

        let client = HttpCatalogClient::new(&config);
        assert!(matches!(
            client.search_url_for("soie"),
            Err(LookupError::Internal(_))
        ));
    }
}
