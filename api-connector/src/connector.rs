//! Connector construction
//!
//! A [`Connector`] owns everything endpoints share: global settings, the
//! session and locale collaborators and the request executor. Endpoints are
//! created from it and keep a cheap clone.

use crate::config::ConnectorConfig;
use crate::endpoint::Endpoint;
use crate::error::ClientError;
use crate::executor::RequestExecutor;
use crate::notify::NotificationDispatcher;
use crate::session::{FixedLocale, LocaleProvider, NoSession, SessionProvider};
use crate::settings::EndpointSettings;
use crate::transport::{NetworkTransport, Transport};
use std::sync::Arc;

/// Entry point for defining endpoints
///
/// # Example
///
/// ```no_run
/// use api_connector::{Connector, ConnectorConfig, Endpoint, EndpointSettings};
///
/// # fn main() -> Result<(), api_connector::ClientError> {
/// let connector = Connector::builder(ConnectorConfig::new("https://api.example.com")).build()?;
/// let users: Endpoint<Vec<serde_json::Value>> = connector.endpoint(EndpointSettings::get("/users"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Connector {
    inner: Arc<ConnectorInner>,
}

struct ConnectorInner {
    config: ConnectorConfig,
    session: Arc<dyn SessionProvider>,
    locale: Arc<dyn LocaleProvider>,
    executor: RequestExecutor,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("config", &self.inner.config)
            .field("executor", &self.inner.executor)
            .finish()
    }
}

impl Connector {
    /// Start building a connector
    pub fn builder(config: ConnectorConfig) -> ConnectorBuilder {
        ConnectorBuilder::new(config)
    }

    /// Define an endpoint
    ///
    /// `T` is the success payload, `E` the error payload and `P` the request
    /// payload. Annotate the binding to pick them:
    /// `let e: Endpoint<User> = connector.endpoint(...)`.
    pub fn endpoint<T, E, P>(&self, settings: EndpointSettings<P>) -> Endpoint<T, E, P> {
        Endpoint::new(self.clone(), settings)
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.inner.config
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.inner.executor
    }

    pub(crate) fn session(&self) -> &dyn SessionProvider {
        self.inner.session.as_ref()
    }

    pub(crate) fn locale(&self) -> &dyn LocaleProvider {
        self.inner.locale.as_ref()
    }
}

/// Builder for [`Connector`]
///
/// Defaults: network transport, anonymous session, the configured language
/// as locale and no notifications.
pub struct ConnectorBuilder {
    config: ConnectorConfig,
    transport: Option<Arc<dyn Transport>>,
    session: Option<Arc<dyn SessionProvider>>,
    locale: Option<Arc<dyn LocaleProvider>>,
    notifier: Option<Arc<NotificationDispatcher>>,
}

impl ConnectorBuilder {
    pub fn new(config: ConnectorConfig) -> Self {
        Self {
            config,
            transport: None,
            session: None,
            locale: None,
            notifier: None,
        }
    }

    /// Use a custom transport (in-process router, test double, ...)
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Session that supplies tokens for authorized endpoints
    pub fn session(mut self, session: impl SessionProvider + 'static) -> Self {
        self.session = Some(Arc::new(session));
        self
    }

    /// Locale used when a call names no language
    pub fn locale(mut self, locale: impl LocaleProvider + 'static) -> Self {
        self.locale = Some(Arc::new(locale));
        self
    }

    /// Enable feedback notifications
    pub fn notifications(mut self, dispatcher: NotificationDispatcher) -> Self {
        self.notifier = Some(Arc::new(dispatcher));
        self
    }

    /// Build the connector
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the default network client cannot be created.
    pub fn build(self) -> Result<Connector, ClientError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(NetworkTransport::new(&self.config)?),
        };

        let mut executor = RequestExecutor::new(transport);
        if let Some(notifier) = self.notifier {
            executor = executor.with_notifier(notifier);
        }

        let locale = self
            .locale
            .unwrap_or_else(|| Arc::new(FixedLocale(self.config.lang.clone())));

        tracing::debug!(origin = %self.config.origin, "API connector ready");

        Ok(Connector {
            inner: Arc::new(ConnectorInner {
                session: self.session.unwrap_or_else(|| Arc::new(NoSession)),
                locale,
                executor,
                config: self.config,
            }),
        })
    }
}
