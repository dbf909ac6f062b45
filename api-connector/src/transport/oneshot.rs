// api-connector/src/transport/oneshot.rs
// Oneshot transport - in-process calls into an axum Router

use super::{Transport, TransportBody, TransportRequest, TransportResponse};
use crate::error::{ClientError, ClientResult};
use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::Request;
use tower::ServiceExt;

/// Oneshot transport (in-memory calls)
///
/// Drives an axum `Router` through Tower's `oneshot`, for applications that
/// host the API in the same process and for tests. Only the path and query
/// of the request URL are used for routing.
///
/// # Example
///
/// ```ignore
/// use api_connector::{Connector, ConnectorConfig, OneshotTransport};
///
/// let router: Router = build_app().with_state(state);
/// let connector = Connector::builder(ConnectorConfig::new("http://local"))
///     .transport(OneshotTransport::new(router))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotTransport {
    router: Router,
}

impl OneshotTransport {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    fn build_request(request: TransportRequest) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder()
            .method(http::Method::from(request.method))
            .uri(&request.url);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = match request.body {
            TransportBody::Empty => Body::empty(),
            TransportBody::Text(text) => Body::from(text),
            TransportBody::Multipart(form) => {
                let boundary = format!("connector-{}", uuid::Uuid::new_v4().simple());
                builder = builder.header(
                    http::header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                );
                Body::from(form.encode(&boundary))
            }
        };

        builder
            .body(body)
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))
    }
}

#[async_trait]
impl Transport for OneshotTransport {
    async fn send(&self, request: TransportRequest) -> ClientResult<TransportResponse> {
        let request = Self::build_request(request)?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Transport(format!("Oneshot call failed: {}", e)))?;

        let (parts, body) = response.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read body: {}", e)))?;

        Ok(TransportResponse {
            status: parts.status.as_u16(),
            headers: parts.headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use shared::{Method, MultipartForm};

    #[tokio::test]
    async fn test_oneshot_roundtrip() {
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        let transport = OneshotTransport::new(router);

        let response = transport
            .send(TransportRequest {
                method: Method::Get,
                url: "http://in-process/ping".into(),
                headers: Vec::new(),
                body: TransportBody::Empty,
            })
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(&response.body[..], b"pong");
    }

    #[test]
    fn test_multipart_sets_boundary() {
        let request = OneshotTransport::build_request(TransportRequest {
            method: Method::Post,
            url: "/upload".into(),
            headers: vec![("accept".into(), "multipart/form-data".into())],
            body: TransportBody::Multipart(MultipartForm::new().text("a", "b")),
        })
        .unwrap();

        let content_type = request
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary=connector-"));
    }
}
