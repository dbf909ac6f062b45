//! Connector configuration
//!
//! Global settings shared by every endpoint of a connector.
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | API_ORIGIN | http://localhost:8080 | Origin prefixed to endpoint paths |
//! | API_TIMEOUT_SECS | 30 | Network transport timeout |
//! | API_LANG | (unset) | Fallback language when a call names none |

use shared::HeaderLayer;

/// Global connector settings
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// Origin used when neither the endpoint nor the call overrides it
    pub origin: String,

    /// Headers sent with every request (lowest precedence layer)
    pub default_headers: HeaderLayer,

    /// Request timeout in seconds (network transport)
    pub timeout_secs: u64,

    /// Fallback language tag
    pub lang: Option<String>,
}

impl ConnectorConfig {
    /// Create a configuration for the given origin
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            default_headers: HeaderLayer::new(),
            timeout_secs: 30,
            lang: None,
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            origin: std::env::var("API_ORIGIN").unwrap_or_else(|_| "http://localhost:8080".into()),
            default_headers: HeaderLayer::new(),
            timeout_secs: std::env::var("API_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            lang: std::env::var("API_LANG").ok().filter(|l| !l.is_empty()),
        }
    }

    /// Add a default header
    pub fn with_default_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Replace the default header layer
    pub fn with_default_headers(mut self, headers: HeaderLayer) -> Self {
        self.default_headers = headers;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the fallback language
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
