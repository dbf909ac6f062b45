//! Client error types
//!
//! Failures internal to the request pipeline. They never escape
//! `invoke()`: the executor folds them into the network-failure result.

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// In-process call failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response body did not match its content type
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Translation resources unavailable
    #[error("Translation error: {0}")]
    Translation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
