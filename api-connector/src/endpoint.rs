//! Typed endpoints
//!
//! An [`Endpoint`] is an immutable route definition bound to a connector.
//! Calling it with [`CallSettings`] resolves the request once and returns an
//! [`EndpointHandle`] exposing the cache key, a one-shot `invoke` and a
//! reusable fetcher for caching layers.

use crate::connector::Connector;
use crate::executor::RequestExecutor;
use crate::settings::{CacheKey, CallSettings, EndpointSettings, ResolvedRequest, resolve};
use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{ApiError, ApiResult, StatusError};
use std::marker::PhantomData;
use std::sync::Arc;

/// Throwing fetch function, re-invoked by caching layers on revalidation
pub type Fetcher<T, E> = Arc<dyn Fn() -> BoxFuture<'static, Result<Option<T>, ApiError<E>>> + Send + Sync>;

/// Endpoint with declared success (`T`), error (`E`) and payload (`P`) types
pub struct Endpoint<T, E = Value, P = Value> {
    connector: Connector,
    settings: Arc<EndpointSettings<P>>,
    _types: PhantomData<fn() -> (T, E)>,
}

impl<T, E, P> Clone for Endpoint<T, E, P> {
    fn clone(&self) -> Self {
        Self {
            connector: self.connector.clone(),
            settings: self.settings.clone(),
            _types: PhantomData,
        }
    }
}

impl<T, E, P: std::fmt::Debug> std::fmt::Debug for Endpoint<T, E, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint").field("settings", &self.settings).finish()
    }
}

impl<T, E, P> Endpoint<T, E, P> {
    pub(crate) fn new(connector: Connector, settings: EndpointSettings<P>) -> Self {
        Self {
            connector,
            settings: Arc::new(settings),
            _types: PhantomData,
        }
    }

    pub fn settings(&self) -> &EndpointSettings<P> {
        &self.settings
    }
}

impl<T, E, P: Clone> Endpoint<T, E, P> {
    /// Resolve a call against this endpoint
    pub fn call(&self, call: CallSettings<P>) -> EndpointHandle<T, E, P> {
        let request = resolve(
            self.connector.config(),
            &self.settings,
            call,
            self.connector.session(),
            self.connector.locale(),
        );
        EndpointHandle {
            executor: self.connector.executor().clone(),
            request: Arc::new(request),
            _types: PhantomData,
        }
    }
}

/// A resolved call, ready to run any number of times
pub struct EndpointHandle<T, E = Value, P = Value> {
    executor: RequestExecutor,
    request: Arc<ResolvedRequest<P>>,
    _types: PhantomData<fn() -> (T, E)>,
}

impl<T, E, P> Clone for EndpointHandle<T, E, P> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            request: self.request.clone(),
            _types: PhantomData,
        }
    }
}

impl<T, E, P> EndpointHandle<T, E, P> {
    /// Cache identity of this call
    pub fn keys(&self) -> CacheKey {
        self.request.cache_key()
    }

    pub fn request(&self) -> &ResolvedRequest<P> {
        &self.request
    }
}

impl<T, E, P> EndpointHandle<T, E, P>
where
    T: DeserializeOwned + Send + 'static,
    E: DeserializeOwned + From<StatusError> + Send + 'static,
    P: Serialize + Send + Sync + 'static,
{
    /// Run the call; never fails, check the result variant
    pub async fn invoke(&self) -> ApiResult<T, E> {
        self.executor.invoke(&self.request).await
    }

    /// Run the call; non-2xx responses become an [`ApiError`]
    pub async fn fetch(&self) -> Result<Option<T>, ApiError<E>> {
        self.executor.fetch_or_throw(&self.request).await
    }

    /// Reusable fetch function for caching layers
    pub fn fetcher(&self) -> Fetcher<T, E> {
        let executor = self.executor.clone();
        let request = self.request.clone();
        Arc::new(move || {
            let executor = executor.clone();
            let request = request.clone();
            Box::pin(async move { executor.fetch_or_throw(&request).await })
        })
    }
}
