//! Request types for the shared crate
//!
//! Building blocks of an outgoing API request: method, header layers,
//! query parameters and payloads.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// HTTP method an endpoint may be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    /// Mutating methods must declare a notification policy
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Self::Get)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
            Method::Patch => http::Method::PATCH,
            Method::Put => http::Method::PUT,
            Method::Delete => http::Method::DELETE,
        }
    }
}

// =============================================================================
// Headers
// =============================================================================

/// One layer of request headers.
///
/// Names are stored lower-case so layers merge case-insensitively. A `None`
/// value is an explicit unset: it shadows lower layers and is dropped before
/// the request is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderLayer {
    entries: BTreeMap<String, Option<String>>,
}

impl HeaderLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header value
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Explicitly unset a header so lower layers cannot provide it
    pub fn without(mut self, name: impl AsRef<str>) -> Self {
        self.unset(name);
        self
    }

    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.entries
            .insert(name.as_ref().to_ascii_lowercase(), Some(value.into()));
    }

    pub fn unset(&mut self, name: impl AsRef<str>) {
        self.entries.insert(name.as_ref().to_ascii_lowercase(), None);
    }

    /// Forget a header entirely (neither set nor unset)
    pub fn remove(&mut self, name: impl AsRef<str>) {
        self.entries.remove(&name.as_ref().to_ascii_lowercase());
    }

    /// Resolved value of a header; `None` when absent or unset
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        self.entries
            .get(&name.as_ref().to_ascii_lowercase())
            .and_then(|v| v.as_deref())
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `other` on top of this layer, later entries win per key
    pub fn merge(mut self, other: &HeaderLayer) -> Self {
        for (name, value) in &other.entries {
            self.entries.insert(name.clone(), value.clone());
        }
        self
    }

    /// Headers that will actually be sent, unset entries dropped
    pub fn resolved(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name.clone(), v.clone())))
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for HeaderLayer {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut layer = Self::new();
        for (name, value) in iter {
            layer.insert(name, value);
        }
        layer
    }
}

// =============================================================================
// Query
// =============================================================================

/// A query parameter value: one value or a sequence serialized as repeated keys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Many(Vec<String>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Ordered query parameters, insertion order is kept on the wire
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Flattened `(key, value)` pairs, sequences expanded into repeated keys
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.params {
            match value {
                QueryValue::Single(v) => pairs.push((key.as_str(), v.as_str())),
                QueryValue::Many(vs) => {
                    pairs.extend(vs.iter().map(|v| (key.as_str(), v.as_str())));
                }
            }
        }
        pairs
    }

    /// `application/x-www-form-urlencoded` serialization without leading `?`
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs())
            .finish()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// =============================================================================
// Payload
// =============================================================================

/// A single part of a multipart form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Binary multipart form payload.
///
/// Sent as-is; the transport chooses the boundary and writes the
/// `content-type` header itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain text field
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: Bytes::from(value.into()),
        });
        self
    }

    /// Add a file field
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push(FormPart {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type: Some(content_type.into()),
            data: data.into(),
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Encode as a `multipart/form-data` body with the given boundary
    pub fn encode(&self, boundary: &str) -> Bytes {
        let mut body = Vec::new();
        for part in &self.parts {
            body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
            let mut disposition =
                format!("Content-Disposition: form-data; name=\"{}\"", escape_disposition(&part.name));
            if let Some(file_name) = &part.file_name {
                disposition.push_str(&format!("; filename=\"{}\"", escape_disposition(file_name)));
            }
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(b"\r\n");
            if let Some(content_type) = &part.content_type {
                body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(&part.data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
        Bytes::from(body)
    }
}

/// Percent-encode the characters that would end a quoted disposition value,
/// the same way browsers encode form field and file names
fn escape_disposition(value: &str) -> String {
    value.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}

/// Request payload: a JSON-serializable value or a multipart form
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPayload<P> {
    Json(P),
    Multipart(MultipartForm),
}

impl<P> RequestPayload<P> {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}
