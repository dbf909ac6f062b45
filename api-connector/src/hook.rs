//! Caching hook adapter
//!
//! Connects an [`Endpoint`] to an external revalidating cache. The resolved
//! call's [`CacheKey`] identifies the cache entry and its fetcher is the
//! revalidation function. Fetch failures can be surfaced to a page-wide
//! error sink while the consuming view is still mounted.

use crate::endpoint::{Endpoint, Fetcher};
use crate::settings::{CacheKey, CallSettings};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::{ApiError, StatusError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Called with every fetch failure
pub type ErrorCallback<E> = Arc<dyn Fn(&ApiError<E>) + Send + Sync>;

/// Whether the subscription is paused
pub type PausedPredicate = Arc<dyn Fn() -> bool + Send + Sync>;

/// Revalidation options handed to the cache provider
///
/// `None` leaves a flag to the provider's defaults.
pub struct CacheConfig<E> {
    pub revalidate_if_stale: Option<bool>,
    pub revalidate_on_focus: Option<bool>,
    pub revalidate_on_reconnect: Option<bool>,
    pub refresh_interval: Option<Duration>,
    pub dedupe_interval: Option<Duration>,
    /// Evaluated once at subscription time, never forwarded
    pub is_paused: Option<PausedPredicate>,
    pub on_error: Option<ErrorCallback<E>>,
}

impl<E> Default for CacheConfig<E> {
    fn default() -> Self {
        Self {
            revalidate_if_stale: None,
            revalidate_on_focus: None,
            revalidate_on_reconnect: None,
            refresh_interval: None,
            dedupe_interval: None,
            is_paused: None,
            on_error: None,
        }
    }
}

impl<E> Clone for CacheConfig<E> {
    fn clone(&self) -> Self {
        Self {
            revalidate_if_stale: self.revalidate_if_stale,
            revalidate_on_focus: self.revalidate_on_focus,
            revalidate_on_reconnect: self.revalidate_on_reconnect,
            refresh_interval: self.refresh_interval,
            dedupe_interval: self.dedupe_interval,
            is_paused: self.is_paused.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<E> std::fmt::Debug for CacheConfig<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheConfig")
            .field("revalidate_if_stale", &self.revalidate_if_stale)
            .field("revalidate_on_focus", &self.revalidate_on_focus)
            .field("revalidate_on_reconnect", &self.revalidate_on_reconnect)
            .field("refresh_interval", &self.refresh_interval)
            .field("dedupe_interval", &self.dedupe_interval)
            .field("is_paused", &self.is_paused.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl<E> CacheConfig<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = Some(interval);
        self
    }

    pub fn dedupe_interval(mut self, interval: Duration) -> Self {
        self.dedupe_interval = Some(interval);
        self
    }

    pub fn revalidate_on_focus(mut self, enabled: bool) -> Self {
        self.revalidate_on_focus = Some(enabled);
        self
    }

    pub fn paused_when(mut self, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.is_paused = Some(Arc::new(predicate));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&ApiError<E>) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    fn immutable(mut self) -> Self {
        self.revalidate_if_stale.get_or_insert(false);
        self.revalidate_on_focus.get_or_insert(false);
        self.revalidate_on_reconnect.get_or_insert(false);
        self
    }
}

/// Snapshot of a cache entry
#[derive(Debug, Clone)]
pub struct CacheState<T, E> {
    pub data: Option<T>,
    pub error: Option<ApiError<E>>,
    pub is_validating: bool,
}

impl<T, E> Default for CacheState<T, E> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_validating: false,
        }
    }
}

/// Revalidating cache (stale-while-revalidate store, query client, ...)
///
/// A `None` key means "no subscription": the provider must not call the fetcher.
pub trait CacheProvider: Send + Sync {
    fn subscribe<T, E>(
        &self,
        key: Option<CacheKey>,
        fetcher: Fetcher<T, E>,
        config: CacheConfig<E>,
    ) -> CacheState<T, E>
    where
        T: Send + 'static,
        E: Send + 'static;
}

/// Page-wide error display
pub trait PageErrorSink<E>: Send + Sync {
    fn set_page_error(&self, error: ApiError<E>);
}

/// Lifetime of the view consuming a subscription
///
/// Dropping the scope (or calling [`unmount`](Self::unmount)) stops page
/// error reporting for every subscription made through it.
#[derive(Debug)]
pub struct ViewScope {
    mounted: Arc<AtomicBool>,
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    fn flag(&self) -> Arc<AtomicBool> {
        self.mounted.clone()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Arguments of one subscription
pub struct HookArgs<P, E> {
    pub call: CallSettings<P>,
    pub config: CacheConfig<E>,
    /// Disable automatic revalidation (stale, focus, reconnect)
    pub immutable: bool,
    /// Report fetch failures to the page error sink
    pub handle_page_error: bool,
}

impl<P, E> Default for HookArgs<P, E> {
    fn default() -> Self {
        Self {
            call: CallSettings::default(),
            config: CacheConfig::default(),
            immutable: false,
            handle_page_error: true,
        }
    }
}

impl<P, E> HookArgs<P, E> {
    pub fn new(call: CallSettings<P>) -> Self {
        Self {
            call,
            ..Self::default()
        }
    }

    pub fn config(mut self, config: CacheConfig<E>) -> Self {
        self.config = config;
        self
    }

    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    pub fn handle_page_error(mut self, enabled: bool) -> Self {
        self.handle_page_error = enabled;
        self
    }
}

/// Endpoint bound to a cache provider
pub struct ApiHook<T, E, P, C> {
    endpoint: Endpoint<T, E, P>,
    provider: Arc<C>,
    page_errors: Option<Arc<dyn PageErrorSink<E>>>,
}

impl<T, E, P, C> ApiHook<T, E, P, C>
where
    T: DeserializeOwned + Send + 'static,
    E: DeserializeOwned + From<StatusError> + Clone + Send + Sync + 'static,
    P: Clone + Serialize + Send + Sync + 'static,
    C: CacheProvider,
{
    pub fn new(
        endpoint: Endpoint<T, E, P>,
        provider: Arc<C>,
        page_errors: Option<Arc<dyn PageErrorSink<E>>>,
    ) -> Self {
        Self {
            endpoint,
            provider,
            page_errors,
        }
    }

    /// Subscribe the resolved call to the cache
    pub fn subscribe(&self, scope: &ViewScope, args: HookArgs<P, E>) -> CacheState<T, E> {
        let HookArgs {
            call,
            mut config,
            immutable,
            handle_page_error,
        } = args;

        let handle = self.endpoint.call(call);

        let paused = config.is_paused.take().is_some_and(|is_paused| is_paused());
        let key = if paused { None } else { Some(handle.keys()) };

        if immutable {
            config = config.immutable();
        }
        config.on_error = Some(self.error_chain(scope, config.on_error.take(), handle_page_error));

        tracing::trace!(key = ?key, immutable, "Cache subscription");
        self.provider.subscribe(key, handle.fetcher(), config)
    }

    fn error_chain(
        &self,
        scope: &ViewScope,
        user: Option<ErrorCallback<E>>,
        handle_page_error: bool,
    ) -> ErrorCallback<E> {
        let mounted = scope.flag();
        let sink = if handle_page_error {
            self.page_errors.clone()
        } else {
            None
        };

        Arc::new(move |error: &ApiError<E>| {
            if let Some(callback) = &user {
                callback(error);
            }
            if let Some(sink) = &sink {
                if mounted.load(Ordering::Acquire) {
                    sink.set_page_error(error.clone());
                }
            }
        })
    }
}
