use anyhow::Result;
use fabric_price_service::{
    api, config::ServiceConfig, price::HttpCatalogClient, price::PriceLookupService,
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServiceConfig::from_env();
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    let client = Arc::new(HttpCatalogClient::new(&config));
    let service = Arc::new(PriceLookupService::new(client, &config));

    api::start_server(&config, service).await
}
