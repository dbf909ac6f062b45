//! API Connector - typed HTTP endpoints
//!
//! Builds strongly-typed endpoint callers from declarative settings, runs
//! the call, normalizes the response into [`ApiResult`] and optionally
//! emits user feedback and feeds a revalidating cache.
//!
//! ```text
//! EndpointSettings ─┐
//! CallSettings ─────┼─ resolve ─> ResolvedRequest ─> RequestExecutor ─> ApiResult
//! ConnectorConfig ──┘                                   │
//!                                                       └─> NotificationDispatcher
//! ```

pub mod config;
pub mod connector;
pub mod endpoint;
pub mod error;
pub mod executor;
pub mod hook;
pub mod logger;
pub mod notify;
pub mod session;
pub mod settings;
pub mod transport;
pub mod url;

pub use config::ConnectorConfig;
pub use connector::{Connector, ConnectorBuilder};
pub use endpoint::{Endpoint, EndpointHandle, Fetcher};
pub use error::{ClientError, ClientResult};
pub use executor::{BLOB_CONTENT_TYPES, ContentKind, RequestExecutor};
pub use hook::{
    ApiHook, CacheConfig, CacheProvider, CacheState, ErrorCallback, HookArgs, PageErrorSink, ViewScope,
};
pub use notify::{
    FeedbackEmitter, NotificationDispatcher, StaticTranslations, TranslationCache, TranslationProvider,
    Translator,
};
pub use session::{EnvLocale, FixedLocale, LocaleProvider, NoSession, SessionProvider, StaticSession};
pub use settings::{CacheKey, CallSettings, EndpointSettings, ResolvedRequest};
pub use transport::{NetworkTransport, OneshotTransport, Transport, TransportBody, TransportRequest, TransportResponse};

// Re-export shared types for convenience
pub use shared::{
    ApiError, ApiResult, Blob, Feedback, FeedbackEvent, FeedbackType, HeaderLayer, Method, MultipartForm,
    NotificationPolicy, QueryParams, QueryValue, StatusError,
};
