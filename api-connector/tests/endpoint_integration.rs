// api-connector/tests/endpoint_integration.rs
// End-to-end calls against an in-process axum router

use api_connector::{
    ApiResult, Blob, CallSettings, ClientError, ClientResult, Connector, ConnectorConfig, Endpoint,
    EndpointSettings, FeedbackEvent, FeedbackType, FixedLocale, MultipartForm, NotificationDispatcher,
    NotificationPolicy, OneshotTransport, QueryParams, StaticSession, StaticTranslations, TranslationCache,
    Transport, TransportRequest, TransportResponse,
};
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: u32,
    name: String,
}

async fn get_user(Path(id): Path<u32>) -> impl IntoResponse {
    if id == 0 {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"msg": "bad"}))).into_response();
    }
    Json(json!({"id": id, "name": "Ann"})).into_response()
}

async fn delete_user() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn missing() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn report() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/pdf")], Bytes::from_static(b"%PDF-1.7"))
}

async fn failed_export() -> impl IntoResponse {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        [(header::CONTENT_TYPE, "text/csv")],
        Bytes::from_static(b"row,error"),
    )
}

async fn page() -> Html<&'static str> {
    Html("<html><body>hi</body></html>")
}

async fn echo(headers: HeaderMap, uri: Uri) -> Json<Value> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "authorization": header("authorization"),
        "content_language": header("content-language"),
        "x_client": header("x-client"),
        "query": uri.query(),
    }))
}

async fn upload(headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);
    Json(json!({
        "accept": header("accept"),
        "content_type": header("content-type"),
        "body": String::from_utf8_lossy(&body),
    }))
}

fn router() -> Router {
    Router::new()
        .route("/users/{id}", get(get_user).delete(delete_user))
        .route("/missing", get(missing))
        .route("/reports/{id}", get(report))
        .route("/exports/failed", get(failed_export))
        .route("/page", get(page))
        .route("/echo", get(echo))
        .route("/upload", post(upload))
}

fn connector() -> Connector {
    Connector::builder(
        ConnectorConfig::new("http://in-process")
            .with_default_header("Content-Type", "application/json")
            .with_default_header("X-Client", "tests"),
    )
    .transport(OneshotTransport::new(router()))
    .session(StaticSession::with_token("session-token"))
    .locale(FixedLocale::new("en"))
    .build()
    .unwrap()
}

#[tokio::test]
async fn test_json_success() {
    let users: Endpoint<User> = connector().endpoint(EndpointSettings::get("/users/:id"));
    let result = users.call(CallSettings::new().param("id", "7")).invoke().await;

    assert_eq!(
        result,
        ApiResult::Ok {
            data: Some(User {
                id: 7,
                name: "Ann".into()
            }),
            status: 200
        }
    );
}

#[tokio::test]
async fn test_json_failure_carries_error_payload() {
    let users: Endpoint<User> = connector().endpoint(EndpointSettings::get("/users/:id"));
    let handle = users.call(CallSettings::new().param("id", "0"));

    let result = handle.invoke().await;
    assert_eq!(
        result,
        ApiResult::Err {
            error: Some(json!({"msg": "bad"})),
            status: 422
        }
    );

    let error = handle.fetch().await.unwrap_err();
    assert_eq!(error.status, 422);
    assert_eq!(error.payload, Some(json!({"msg": "bad"})));
}

#[tokio::test]
async fn test_no_content() {
    let delete: Endpoint<Value> = connector().endpoint(EndpointSettings::delete("/users/:id", None));
    let result = delete.call(CallSettings::new().param("id", "7")).invoke().await;
    assert_eq!(result, ApiResult::Ok { data: None, status: 204 });
}

#[tokio::test]
async fn test_empty_failure_gets_generic_error() {
    let missing: Endpoint<Value> = connector().endpoint(EndpointSettings::get("/missing"));
    let result = missing.call(CallSettings::new()).invoke().await;
    assert_eq!(
        result,
        ApiResult::Err {
            error: Some(json!({"message": "error", "status": 404})),
            status: 404
        }
    );
}

#[tokio::test]
async fn test_pdf_blob() {
    let report: Endpoint<Blob> = connector().endpoint(EndpointSettings::get("/reports/:id"));
    let result = report.call(CallSettings::new().param("id", "1")).invoke().await;

    assert_eq!(result.status(), 200);
    assert_eq!(result.data().map(Blob::as_bytes), Some(&b"%PDF-1.7"[..]));
}

#[tokio::test]
async fn test_binary_failure_keeps_status() {
    let export: Endpoint<Blob> = connector().endpoint(EndpointSettings::get("/exports/failed"));
    let result = export.call(CallSettings::new()).invoke().await;

    assert_ne!(result, ApiResult::network_failure());
    assert_eq!(result.status(), 422);
    let bytes: Vec<u8> = b"row,error".to_vec();
    assert_eq!(
        result,
        ApiResult::Err {
            error: Some(json!(bytes)),
            status: 422
        }
    );
}

#[tokio::test]
async fn test_binary_body_on_default_types() {
    let report: Endpoint<Value> = connector().endpoint(EndpointSettings::get("/reports/:id"));
    let result = report.call(CallSettings::new().param("id", "1")).invoke().await;

    let bytes: Vec<u8> = b"%PDF-1.7".to_vec();
    assert_eq!(
        result,
        ApiResult::Ok {
            data: Some(json!(bytes)),
            status: 200
        }
    );
}

#[tokio::test]
async fn test_unhandled_content_type_drops_body() {
    let page: Endpoint<Value> = connector().endpoint(EndpointSettings::get("/page"));
    let result = page.call(CallSettings::new()).invoke().await;
    assert_eq!(result, ApiResult::Ok { data: None, status: 200 });
}

#[tokio::test]
async fn test_auth_language_and_query_headers() {
    let echo: Endpoint<Value> = connector().endpoint(EndpointSettings::get("/echo").authorized(true));

    let sent = echo
        .call(
            CallSettings::new()
                .lang("pl")
                .query(QueryParams::new().with("tag", vec!["a", "b"])),
        )
        .invoke()
        .await;
    assert_eq!(
        sent.data(),
        Some(&json!({
            "authorization": "bearer session-token",
            "content_language": "pl",
            "x_client": "tests",
            "query": "tag=a&tag=b",
        }))
    );

    // explicit token, locale fallback, default header unset
    let sent = echo
        .call(CallSettings::new().token("explicit").unset_header("x-client"))
        .invoke()
        .await;
    assert_eq!(
        sent.data(),
        Some(&json!({
            "authorization": "bearer explicit",
            "content_language": "en",
            "x_client": null,
            "query": null,
        }))
    );
}

#[tokio::test]
async fn test_multipart_upload() {
    let upload: Endpoint<Value> = connector().endpoint(EndpointSettings::post("/upload", None));
    let form = MultipartForm::new().file("file", "a.csv", "text/csv", Bytes::from_static(b"x,y"));

    let sent = upload.call(CallSettings::new().multipart(form)).invoke().await;
    let sent = sent.data().unwrap();

    assert_eq!(sent["accept"], "multipart/form-data");
    assert!(
        sent["content_type"]
            .as_str()
            .unwrap()
            .starts_with("multipart/form-data; boundary=")
    );
    assert!(sent["body"].as_str().unwrap().contains("filename=\"a.csv\""));
}

#[tokio::test]
async fn test_notifications_follow_policy() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let translations = StaticTranslations::new().with("en", "user.deleted", "User deleted");
    let connector = Connector::builder(ConnectorConfig::new("http://in-process"))
        .transport(OneshotTransport::new(router()))
        .locale(FixedLocale::new("en"))
        .notifications(NotificationDispatcher::new(
            Arc::new(TranslationCache::new(Arc::new(translations))),
            Arc::new(tx),
        ))
        .build()
        .unwrap();

    let policy = NotificationPolicy::new()
        .silence(404)
        .on_success(FeedbackEvent::success("user.deleted"));
    let delete: Endpoint<Value> = connector.endpoint(EndpointSettings::delete("/users/:id", Some(policy.clone())));
    delete.call(CallSettings::new().param("id", "1")).invoke().await;

    let feedback = rx.try_recv().unwrap();
    assert_eq!(feedback.message, "User deleted");
    assert_eq!(feedback.kind, FeedbackType::Success);
    assert!(rx.try_recv().is_err());

    let missing: Endpoint<Value> = connector.endpoint(EndpointSettings::get("/missing").notifications(policy));
    missing.call(CallSettings::new()).invoke().await;
    assert!(rx.try_recv().is_err());

    // disabled per call
    delete
        .call(CallSettings::new().param("id", "1").notifications(None))
        .invoke()
        .await;
    assert!(rx.try_recv().is_err());
}

// =============================================================================
// Transport failure
// =============================================================================

struct Unreachable;

#[async_trait]
impl Transport for Unreachable {
    async fn send(&self, _request: TransportRequest) -> ClientResult<TransportResponse> {
        Err(ClientError::Transport("connection refused".into()))
    }
}

#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn test_transport_failure_is_logged_once() {
    let logs = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::ERROR)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let connector = Connector::builder(ConnectorConfig::new("http://unreachable"))
        .transport(Unreachable)
        .build()
        .unwrap();
    let create: Endpoint<Value> = connector.endpoint(EndpointSettings::post("/users", None));
    let handle = create.call(CallSettings::new().payload(json!({"name": "Ann"})));

    let result = handle.invoke().await;
    assert_eq!(result, ApiResult::network_failure());
    assert_eq!(result.status(), 500);

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert_eq!(output.matches("API connector error").count(), 1);
    assert!(output.contains("method=POST"));
    assert!(output.contains("url=http://unreachable/users"));

    let error = handle.fetch().await.unwrap_err();
    assert!(error.is_network_failure());
}

#[tokio::test]
async fn test_cache_keys_depend_on_token() {
    let users: Endpoint<User> = connector().endpoint(EndpointSettings::get("/users/:id").authorized(true));

    let session = users.call(CallSettings::new().param("id", "1"));
    let same = users.call(CallSettings::new().param("id", "1"));
    let explicit = users.call(CallSettings::new().param("id", "1").token("other"));

    assert_eq!(session.keys(), same.keys());
    assert_ne!(session.keys(), explicit.keys());
    assert_eq!(
        session.keys().as_array(),
        ["http://in-process/users/1", "bearer session-token"]
    );
}
