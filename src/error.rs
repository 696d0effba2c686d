//! Unified error types for the price watcher.

use thiserror::Error;

/// Unified error type for the watcher.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Price/market data fetch error.
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// State file error.
    #[error("state error: {0}")]
    State(#[from] StateError),

    /// Webhook delivery error.
    #[error("notify error: {0}")]
    Notify(#[from] NotifyError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the price/market data provider.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (timeout, DNS, connection reset).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}")]
    BadStatus {
        /// Endpoint path that failed.
        endpoint: String,
        /// Response status code.
        status: reqwest::StatusCode,
    },

    /// Provider payload was missing an expected field.
    #[error("provider payload missing field: {field}")]
    MissingField {
        /// Dotted path of the absent field.
        field: &'static str,
    },
}

/// Errors while persisting the state record.
///
/// Load failures are recovered locally (the store falls back to a default
/// record), so only save-side errors surface here.
#[derive(Error, Debug)]
pub enum StateError {
    /// Filesystem error while writing the record.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Webhook delivery errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Transport-level failure.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Webhook answered with a non-success status.
    #[error("webhook returned HTTP {status}: {body}")]
    BadStatus {
        /// Response status code.
        status: reqwest::StatusCode,
        /// Response body, for diagnostics.
        body: String,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;
