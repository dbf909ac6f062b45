//! Settings layering
//!
//! Three layers make up a request:
//!
//! 1. global connector settings ([`ConnectorConfig`])
//! 2. endpoint settings ([`EndpointSettings`]), fixed at definition time
//! 3. call settings ([`CallSettings`]), supplied per invocation
//!
//! [`resolve`] merges them into a [`ResolvedRequest`]. Precedence is
//! call > endpoint > global for every field; headers merge per key.

use crate::config::ConnectorConfig;
use crate::session::{LocaleProvider, SessionProvider};
use crate::url::{create_url, with_query};
use serde::Serialize;
use shared::{HeaderLayer, Method, MultipartForm, NotificationPolicy, QueryParams, RequestPayload};
use std::collections::HashMap;

// =============================================================================
// Endpoint settings
// =============================================================================

/// Static description of one API route
///
/// Mutating methods take their notification policy in the constructor, so a
/// `POST`/`PATCH`/`PUT`/`DELETE` endpoint cannot be defined without stating
/// one (`None` being an explicit "no feedback").
#[derive(Debug, Clone)]
pub struct EndpointSettings<P = serde_json::Value> {
    pub(crate) url: String,
    pub(crate) method: Method,
    pub(crate) origin: Option<String>,
    pub(crate) headers: HeaderLayer,
    pub(crate) query: QueryParams,
    pub(crate) payload: Option<RequestPayload<P>>,
    pub(crate) authorized: bool,
    pub(crate) token: Option<String>,
    pub(crate) notifications: Option<NotificationPolicy>,
}

impl<P> EndpointSettings<P> {
    fn with_method(method: Method, url: impl Into<String>, notifications: Option<NotificationPolicy>) -> Self {
        Self {
            url: url.into(),
            method,
            origin: None,
            headers: HeaderLayer::new(),
            query: QueryParams::new(),
            payload: None,
            authorized: false,
            token: None,
            notifications,
        }
    }

    /// `GET` endpoint, notifications optional
    pub fn get(url: impl Into<String>) -> Self {
        Self::with_method(Method::Get, url, None)
    }

    pub fn post(url: impl Into<String>, notifications: Option<NotificationPolicy>) -> Self {
        Self::with_method(Method::Post, url, notifications)
    }

    pub fn patch(url: impl Into<String>, notifications: Option<NotificationPolicy>) -> Self {
        Self::with_method(Method::Patch, url, notifications)
    }

    pub fn put(url: impl Into<String>, notifications: Option<NotificationPolicy>) -> Self {
        Self::with_method(Method::Put, url, notifications)
    }

    pub fn delete(url: impl Into<String>, notifications: Option<NotificationPolicy>) -> Self {
        Self::with_method(Method::Delete, url, notifications)
    }

    /// Attach a notification policy (the only way for `GET`)
    pub fn notifications(mut self, policy: NotificationPolicy) -> Self {
        self.notifications = Some(policy);
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Unset a header coming from the connector defaults
    pub fn unset_header(mut self, name: impl AsRef<str>) -> Self {
        self.headers.unset(name);
        self
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    pub fn payload(mut self, payload: P) -> Self {
        self.payload = Some(RequestPayload::Json(payload));
        self
    }

    pub fn authorized(mut self, authorized: bool) -> Self {
        self.authorized = authorized;
        self
    }

    /// Fixed token, takes precedence over the session
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

// =============================================================================
// Call settings
// =============================================================================

/// Per-call overrides
#[derive(Debug, Clone)]
pub struct CallSettings<P = serde_json::Value> {
    pub(crate) params: HashMap<String, String>,
    pub(crate) method: Option<Method>,
    pub(crate) query: Option<QueryParams>,
    pub(crate) headers: HeaderLayer,
    pub(crate) payload: Option<RequestPayload<P>>,
    pub(crate) origin: Option<String>,
    pub(crate) authorized: Option<bool>,
    pub(crate) token: Option<String>,
    pub(crate) lang: Option<String>,
    pub(crate) notifications: Option<Option<NotificationPolicy>>,
}

impl<P> Default for CallSettings<P> {
    fn default() -> Self {
        Self {
            params: HashMap::new(),
            method: None,
            query: None,
            headers: HeaderLayer::new(),
            payload: None,
            origin: None,
            authorized: None,
            token: None,
            lang: None,
            notifications: None,
        }
    }
}

impl<P> CallSettings<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for a `:name` placeholder
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Call with another method
    ///
    /// Like the endpoint constructors, a mutating method states its own
    /// notification policy. `GET` never notifies.
    pub fn method(mut self, method: Method, notifications: Option<NotificationPolicy>) -> Self {
        self.method = Some(method);
        self.notifications = Some(if method == Method::Get { None } else { notifications });
        self
    }

    /// Replace the endpoint's default query
    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = Some(query);
        self
    }

    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Unset a header coming from the endpoint or connector layers
    pub fn unset_header(mut self, name: impl AsRef<str>) -> Self {
        self.headers.unset(name);
        self
    }

    pub fn payload(mut self, payload: P) -> Self {
        self.payload = Some(RequestPayload::Json(payload));
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.payload = Some(RequestPayload::Multipart(form));
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn authorized(mut self, authorized: bool) -> Self {
        self.authorized = Some(authorized);
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    /// Override the endpoint notification policy; `None` disables feedback
    pub fn notifications(mut self, policy: Option<NotificationPolicy>) -> Self {
        self.notifications = Some(policy);
        self
    }
}

// =============================================================================
// Resolved request
// =============================================================================

/// Identity of a request for the caching collaborator: `[origin + path, credential]`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CacheKey {
    pub url: String,
    pub token: String,
}

impl CacheKey {
    pub fn as_array(&self) -> [&str; 2] {
        [&self.url, &self.token]
    }
}

/// Fully merged request, ready for the executor
#[derive(Debug, Clone)]
pub struct ResolvedRequest<P> {
    pub origin: String,
    /// Path with parameters substituted and query string appended
    pub path: String,
    pub method: Method,
    pub headers: HeaderLayer,
    pub payload: Option<RequestPayload<P>>,
    /// `bearer <token>` when the request is authenticated
    pub credential: Option<String>,
    /// Language tag, empty when none could be resolved
    pub lang: String,
    pub notifications: Option<NotificationPolicy>,
}

impl<P> ResolvedRequest<P> {
    pub fn url(&self) -> String {
        format!("{}{}", self.origin, self.path)
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            url: self.url(),
            token: self.credential.clone().unwrap_or_default(),
        }
    }
}

/// Wrap a raw token as an authorization credential
pub fn bearer(token: &str) -> String {
    format!("bearer {}", token)
}

fn non_empty(value: Option<&String>) -> Option<&String> {
    value.filter(|v| !v.is_empty())
}

/// Merge the three layers into one request
pub fn resolve<P: Clone>(
    global: &ConnectorConfig,
    endpoint: &EndpointSettings<P>,
    call: CallSettings<P>,
    session: &dyn SessionProvider,
    locale: &dyn LocaleProvider,
) -> ResolvedRequest<P> {
    let origin = non_empty(call.origin.as_ref())
        .or(non_empty(endpoint.origin.as_ref()))
        .unwrap_or(&global.origin)
        .clone();

    let headers = global
        .default_headers
        .clone()
        .merge(&endpoint.headers)
        .merge(&call.headers);

    let query = call.query.as_ref().unwrap_or(&endpoint.query);
    let path = with_query(create_url(&endpoint.url, &call.params), query);

    // a call token, even empty, shadows the endpoint token
    let token = call.token.as_ref().or(endpoint.token.as_ref());
    let credential = match non_empty(token) {
        Some(token) => Some(bearer(token)),
        None if call.authorized.unwrap_or(endpoint.authorized) => {
            session.token().filter(|t| !t.is_empty()).map(|t| bearer(&t))
        }
        None => None,
    };

    let lang = non_empty(call.lang.as_ref())
        .cloned()
        .or_else(|| locale.current_locale().filter(|l| !l.is_empty()))
        .unwrap_or_default();

    let notifications = match call.notifications {
        Some(policy) => policy,
        None => endpoint.notifications.clone(),
    };

    ResolvedRequest {
        origin,
        path,
        method: call.method.unwrap_or(endpoint.method),
        headers,
        payload: call.payload.or_else(|| endpoint.payload.clone()),
        credential,
        lang,
        notifications,
    }
}
