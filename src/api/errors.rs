//! Wire-format error responses
//!
//! The only place lookup errors are translated into HTTP responses. Messages
//! are kept identical to the original service's wire contract.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::price::LookupError;

/// JSON error body: `{ "error": ... }` with an optional `message` detail
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Errors surfaced by the HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// The `tissu` query parameter is missing
    MissingQueryParam,
    /// The lookup itself failed
    Lookup(LookupError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingQueryParam => StatusCode::BAD_REQUEST,
            ApiError::Lookup(LookupError::InvalidQuery) => StatusCode::BAD_REQUEST,
            ApiError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        match self {
            ApiError::MissingQueryParam | ApiError::Lookup(LookupError::InvalidQuery) => {
                ErrorBody {
                    error: "Le paramètre \"tissu\" est requis".to_string(),
                    message: None,
                }
            }
            ApiError::Lookup(e) => ErrorBody {
                error: "Erreur lors de la récupération du prix".to_string(),
                message: Some(e.to_string()),
            },
        }
    }
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        ApiError::Lookup(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_param_is_client_error() {
        let error = ApiError::MissingQueryParam;
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);

        let body = error.to_body();
        assert!(body.error.contains("tissu"));
        assert!(body.message.is_none());
    }

    #[test]
    fn test_invalid_query_is_client_error() {
        let error = ApiError::Lookup(LookupError::InvalidQuery);
        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_lookup_failures_are_server_errors() {
        let fetch = ApiError::Lookup(LookupError::Fetch {
            status: Some(503),
            message: "upstream down".to_string(),
        });
        assert_eq!(fetch.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = fetch.to_body();
        assert_eq!(body.error, "Erreur lors de la récupération du prix");
        assert!(body.message.unwrap().contains("503"));

        let no_prices = ApiError::Lookup(LookupError::NoPricesFound);
        assert_eq!(no_prices.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(no_prices.to_body().message.is_some());
    }

    #[test]
    fn test_error_body_serialization_omits_empty_message() {
        let body = ApiError::MissingQueryParam.to_body();
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("message").is_none());
        assert!(json.get("error").is_some());
    }
}
