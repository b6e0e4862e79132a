pub mod api;
pub mod config;
pub mod price;

// Re-export main types
pub use config::ServiceConfig;
pub use price::{
    CatalogClient, HttpCatalogClient, LookupError, PriceCache, PriceLookupService, PriceQuery,
    PriceResult,
};
