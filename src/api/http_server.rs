//! Axum HTTP server for the price lookup endpoint

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::errors::ApiError;
use crate::config::ServiceConfig;
use crate::price::PriceLookupService;

#[derive(Clone)]
struct AppState {
    service: Arc<PriceLookupService>,
}

/// Build the service router
///
/// Exposed separately from [`start_server`] so tests can drive it directly.
pub fn build_router(service: Arc<PriceLookupService>) -> Router {
    let state = AppState { service };

    // Permissive CORS matching the original contract; the layer also answers
    // browser preflights itself.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]);

    Router::new()
        .route("/", get(price_handler).options(options_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(
    config: &ServiceConfig,
    service: Arc<PriceLookupService>,
) -> anyhow::Result<()> {
    let app = build_router(service);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Price service listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct PriceParams {
    tissu: Option<String>,
}

async fn price_handler(
    State(state): State<AppState>,
    Query(params): Query<PriceParams>,
) -> Result<impl IntoResponse, ApiError> {
    let tissu = params.tissu.ok_or(ApiError::MissingQueryParam)?;
    let result = state.service.lookup(&tissu).await?;
    Ok(Json(result))
}

// Non-preflight OPTIONS: no body, CORS headers come from the layer
async fn options_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
