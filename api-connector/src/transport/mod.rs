//! Transport layer
//!
//! The executor hands a fully built [`TransportRequest`] to a [`Transport`]
//! and gets the raw status, headers and buffered body back.
//!
//! - [`NetworkTransport`]: real HTTP through `reqwest`
//! - [`OneshotTransport`]: in-process calls into an axum `Router`

mod network;
mod oneshot;

pub use network::NetworkTransport;
pub use oneshot::OneshotTransport;

use crate::error::ClientResult;
use async_trait::async_trait;
use bytes::Bytes;
use http::HeaderMap;
use shared::{Method, MultipartForm};

/// Body of an outgoing request
#[derive(Debug, Clone, PartialEq)]
pub enum TransportBody {
    Empty,
    /// Serialized JSON text
    Text(String),
    /// Multipart form, boundary chosen by the transport
    Multipart(MultipartForm),
}

/// Request as handed to the wire
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: TransportBody,
}

impl TransportRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response with a fully buffered body
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TransportResponse {
    /// Header value, `None` when absent or not valid text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// 2xx family
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request/response primitive the executor runs on
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform exactly one request
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse>;
}
