//! Request execution and response normalization
//!
//! Turns a [`ResolvedRequest`] into exactly one transport call and folds
//! whatever comes back into an [`ApiResult`].
//!
//! # Decoding
//!
//! The response body is decoded according to its [`ContentKind`]:
//!
//! | Kind | Success | Failure |
//! |------|---------|---------|
//! | `Empty` | `data: None` | `error: StatusError` |
//! | `Json` | body parsed into `T` | body parsed into `E` |
//! | `Blob` | body handed to `T` as bytes | body handed to `E` as bytes |
//! | `Unhandled` | `data: None` | `error: None` |
//!
//! Binary bodies reach types that cannot take raw bytes (`serde_json::Value`)
//! through [`Blob`]'s serialized form, an array of byte values. A type that
//! accepts neither gets `None` and a warning; the HTTP status is kept.
//!
//! `Unhandled` drops the body and logs a warning. This is a known gap: add
//! the content type to [`BLOB_CONTENT_TYPES`] when a new document type shows up.

use crate::error::ClientResult;
use crate::notify::NotificationDispatcher;
use crate::settings::ResolvedRequest;
use crate::transport::{Transport, TransportBody, TransportRequest, TransportResponse};
use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::de::value::{BytesDeserializer, Error as ValueError};
use shared::{ApiError, ApiResult, Blob, RequestPayload, StatusError};
use std::sync::Arc;

/// Content types decoded as opaque binary bodies
pub const BLOB_CONTENT_TYPES: &[&str] = &["application/pdf", "text/csv"];

/// Normalized content-type category of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// Zero content-length or no content type
    Empty,
    Json,
    Blob,
    /// Anything else, body is not decoded
    Unhandled(String),
}

impl ContentKind {
    pub fn classify(content_type: Option<&str>, content_length: Option<&str>) -> Self {
        let content_type = content_type.map(str::trim).unwrap_or_default();
        if content_length.map(str::trim) == Some("0") || content_type.is_empty() {
            return Self::Empty;
        }

        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence.contains("application/json") {
            Self::Json
        } else if BLOB_CONTENT_TYPES.contains(&essence.as_str()) {
            Self::Blob
        } else {
            Self::Unhandled(content_type.to_string())
        }
    }

    pub fn of(response: &TransportResponse) -> Self {
        Self::classify(
            response.header(http::header::CONTENT_TYPE.as_str()),
            response.header(http::header::CONTENT_LENGTH.as_str()),
        )
    }
}

/// Runs resolved requests over a transport
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    notifier: Option<Arc<NotificationDispatcher>>,
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("notifier", &self.notifier.is_some())
            .finish()
    }
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            notifier: None,
        }
    }

    /// Fire feedback events for calls that carry a notification policy
    pub fn with_notifier(mut self, notifier: Arc<NotificationDispatcher>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Perform the call; never fails, callers check the result variant
    pub async fn invoke<T, E, P>(&self, request: &ResolvedRequest<P>) -> ApiResult<T, E>
    where
        T: DeserializeOwned,
        E: DeserializeOwned + From<StatusError>,
        P: Serialize + Sync,
    {
        match self.execute(request).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(
                    method = %request.method,
                    url = %request.url(),
                    error = %err,
                    "API connector error. Usually the response headers don't match the actual content \
                     (e.g. content-type is application/json but the body is empty or html)"
                );
                ApiResult::network_failure()
            }
        }
    }

    /// Perform the call and return its data, or an error carrying status and payload
    pub async fn fetch_or_throw<T, E, P>(&self, request: &ResolvedRequest<P>) -> Result<Option<T>, ApiError<E>>
    where
        T: DeserializeOwned,
        E: DeserializeOwned + From<StatusError>,
        P: Serialize + Sync,
    {
        self.invoke(request).await.into_fetch()
    }

    async fn execute<T, E, P>(&self, request: &ResolvedRequest<P>) -> ClientResult<ApiResult<T, E>>
    where
        T: DeserializeOwned,
        E: DeserializeOwned + From<StatusError>,
        P: Serialize + Sync,
    {
        let response = self.transport.send(build_request(request)?).await?;

        tracing::debug!(
            origin = %request.origin,
            url = %request.path,
            status = response.status,
            method = %request.method,
            "API call completed"
        );

        if let (Some(notifier), Some(policy)) = (&self.notifier, &request.notifications) {
            notifier
                .dispatch(policy, &request.lang, response.status, response.is_success())
                .await;
        }

        decode(response)
    }
}

/// Build the wire request: body policy, auth and language headers
pub fn build_request<P: Serialize>(request: &ResolvedRequest<P>) -> ClientResult<TransportRequest> {
    let mut headers = request.headers.clone();

    let body = match &request.payload {
        None => TransportBody::Empty,
        Some(RequestPayload::Multipart(form)) => {
            // the transport writes content-type with the boundary
            headers.insert("accept", "multipart/form-data");
            headers.remove("content-type");
            TransportBody::Multipart(form.clone())
        }
        Some(RequestPayload::Json(payload)) => {
            if !headers.contains("content-type") {
                headers.insert("content-type", "application/json");
            }
            TransportBody::Text(serde_json::to_string(payload)?)
        }
    };

    if let Some(credential) = &request.credential {
        headers.insert("authorization", credential.clone());
    }
    if !request.lang.is_empty() {
        headers.insert("content-language", request.lang.clone());
    }

    Ok(TransportRequest {
        method: request.method,
        url: request.url(),
        headers: headers.resolved(),
        body,
    })
}

/// Fold a raw response into the normalized result
pub fn decode<T, E>(response: TransportResponse) -> ClientResult<ApiResult<T, E>>
where
    T: DeserializeOwned,
    E: DeserializeOwned + From<StatusError>,
{
    let status = response.status;
    let ok = response.is_success();

    let result = match ContentKind::of(&response) {
        ContentKind::Empty => {
            if ok {
                ApiResult::Ok { data: None, status }
            } else {
                ApiResult::Err {
                    error: Some(E::from(StatusError::new(status))),
                    status,
                }
            }
        }
        ContentKind::Json => {
            if ok {
                ApiResult::Ok {
                    data: Some(serde_json::from_slice(&response.body)?),
                    status,
                }
            } else {
                ApiResult::Err {
                    error: Some(serde_json::from_slice(&response.body)?),
                    status,
                }
            }
        }
        ContentKind::Blob => {
            if ok {
                ApiResult::Ok {
                    data: decode_blob(&response.body, status),
                    status,
                }
            } else {
                ApiResult::Err {
                    error: decode_blob(&response.body, status),
                    status,
                }
            }
        }
        ContentKind::Unhandled(content_type) => {
            tracing::warn!(
                content_type = %content_type,
                status,
                "Unhandled content type, add it to the blob content types of the API connector"
            );
            if ok {
                ApiResult::Ok { data: None, status }
            } else {
                ApiResult::Err { error: None, status }
            }
        }
    };

    Ok(result)
}

fn decode_blob<D: DeserializeOwned>(body: &Bytes, status: u16) -> Option<D> {
    if let Ok(value) = D::deserialize(BytesDeserializer::<ValueError>::new(body)) {
        return Some(value);
    }

    match serde_json::to_value(Blob(body.clone())).and_then(serde_json::from_value) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(
                status,
                error = %e,
                "Binary body does not fit the declared type, use Blob to receive it"
            );
            None
        }
    }
}
