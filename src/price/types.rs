//! Core types for fabric price lookups

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Normalized lookup key for a fabric query
///
/// Construction trims surrounding whitespace and lowercases the input, so
/// cosmetic variants of the same query (`"  Cotton "`, `"cotton"`) share one
/// cache entry and one in-flight fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PriceQuery(String);

impl PriceQuery {
    /// Normalize a raw query into a lookup key
    ///
    /// Fails with [`LookupError::InvalidQuery`] when nothing remains after
    /// trimming.
    pub fn parse(raw: &str) -> Result<Self, LookupError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(LookupError::InvalidQuery);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PriceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of one successful price lookup
///
/// Wire field names follow the original client contract.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceResult {
    /// Normalized fabric name the price was computed for
    #[serde(rename = "tissu")]
    pub fabric: String,
    /// Arithmetic mean of the catalog prices, rounded to two decimals
    #[serde(rename = "prix_moyen")]
    pub average_price: f64,
    /// Data source the price came from
    #[serde(rename = "fournisseur")]
    pub supplier: String,
    /// When the producing fetch completed (not part of the wire body)
    #[serde(skip_serializing)]
    pub observed_at: DateTime<Utc>,
}

/// Errors that can occur during a price lookup
///
/// `Clone` so a single outcome can be handed to every caller that joined an
/// in-flight fetch.
#[derive(Debug, Clone, Error)]
pub enum LookupError {
    /// Query was empty after normalization; never reaches the network
    #[error("fabric query is empty")]
    InvalidQuery,

    /// Transport failure, timeout, or non-success upstream status
    #[error("catalog fetch failed{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Fetch {
        /// Upstream HTTP status if one was received
        status: Option<u16>,
        /// Underlying cause
        message: String,
    },

    /// Page retrieved but no parseable price elements were found
    #[error("no prices found on catalog page")]
    NoPricesFound,

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}
