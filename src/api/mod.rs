//! HTTP surface of the price service

pub mod errors;
pub mod http_server;

pub use errors::{ApiError, ErrorBody};
pub use http_server::{build_router, start_server};
