//! Fabric price lookup
//!
//! Resolves a free-text fabric name to a representative market price by
//! scraping the upstream catalog's search page.
//!
//! ## Architecture
//!
//! ```text
//! Query → PriceLookupService → PriceCache (read)
//!             ↓ miss
//!        CatalogClient → HTML → extractor → PriceCache (write)
//! ```
//!
//! Concurrent lookups for the same key are coalesced: the service keeps one
//! in-flight fetch per key and broadcasts its outcome to every waiting caller.

pub mod cache;
pub mod extractor;
pub mod fetcher;
pub mod service;
pub mod types;

pub use cache::{PriceCache, PriceCacheStats};
pub use fetcher::{CatalogClient, HttpCatalogClient};
pub use service::PriceLookupService;
pub use types::{LookupError, PriceQuery, PriceResult};
