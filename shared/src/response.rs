//! API Response types
//!
//! The normalized shape every endpoint call resolves to, whatever the
//! backend answered.

use bytes::Bytes;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Status reported when the request never reached the server
pub const NETWORK_FAILURE_STATUS: u16 = 500;

/// Normalized outcome of an endpoint call
///
/// - `Ok`: 2xx response. `data` is `None` for empty or undecoded bodies.
/// - `Err`: non-2xx response or transport failure. `error` is `None` when
///   the request never completed or the body could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T, E> {
    Ok { data: Option<T>, status: u16 },
    Err { error: Option<E>, status: u16 },
}

impl<T, E> ApiResult<T, E> {
    /// Result of a request that never reached the server
    pub fn network_failure() -> Self {
        Self::Err {
            error: None,
            status: NETWORK_FAILURE_STATUS,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Ok { status, .. } | Self::Err { status, .. } => *status,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ok { data, .. } => data.as_ref(),
            Self::Err { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&E> {
        match self {
            Self::Ok { .. } => None,
            Self::Err { error, .. } => error.as_ref(),
        }
    }

    /// Split into the std `Result`, keeping the status on the error side
    pub fn into_result(self) -> Result<Option<T>, (u16, Option<E>)> {
        match self {
            Self::Ok { data, .. } => Ok(data),
            Self::Err { error, status } => Err((status, error)),
        }
    }
}

/// Generic error for failed responses that carry no body
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct StatusError {
    pub message: String,
    pub status: u16,
}

impl StatusError {
    pub fn new(status: u16) -> Self {
        Self {
            message: "error".to_string(),
            status,
        }
    }
}

impl From<StatusError> for serde_json::Value {
    fn from(err: StatusError) -> Self {
        serde_json::json!({
            "message": err.message,
            "status": err.status,
        })
    }
}

/// Opaque binary body (PDF, CSV, ...)
///
/// Declare `Blob` as an endpoint's result or error type to receive
/// document downloads. It only deserializes from raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Blob(pub Bytes);

impl Blob {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Blob {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Blob {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BlobVisitor;

        impl<'de> Visitor<'de> for BlobVisitor {
            type Value = Blob;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("binary data")
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Blob, E> {
                Ok(Blob(Bytes::copy_from_slice(v)))
            }

            fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Blob, E> {
                Ok(Blob(Bytes::from(v)))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Blob, A::Error> {
                let mut buf = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(byte) = seq.next_element::<u8>()? {
                    buf.push(byte);
                }
                Ok(Blob(Bytes::from(buf)))
            }
        }

        deserializer.deserialize_byte_buf(BlobVisitor)
    }
}
