use std::fmt;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::FetchError;

/// The byte-level GET seam.
///
/// [`HttpTransport`] is the production implementation; tests and demos plug in canned bodies.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

#[async_trait]
impl<X: Transport + ?Sized> Transport for Arc<X> {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).get(url).await
    }
}

/// GET over HTTP with `reqwest`. Non-success statuses become [`FetchError::Status`].
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        wdebug!(url, "HttpTransport::get");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            wwarn!(url, status = status.as_u16(), "HttpTransport::get: non-success status");
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Fetches and decodes JSON, keeping at most one request in flight.
///
/// Starting a fetch cancels the previous one, which then resolves to
/// [`FetchError::Cancelled`]. A stale response can therefore never overwrite a newer one.
pub struct Fetcher<T, X = HttpTransport> {
    transport: X,
    current: Mutex<Option<CancellationToken>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Fetcher<T> {
    pub fn http() -> Self {
        Self::new(HttpTransport::new())
    }
}

impl<T, X> Fetcher<T, X>
where
    T: DeserializeOwned,
    X: Transport,
{
    pub fn new(transport: X) -> Self {
        Self {
            transport,
            current: Mutex::new(None),
            _marker: PhantomData,
        }
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    fn begin(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let previous = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
            wtrace!("Fetcher: cancelled in-flight request");
        }
        token
    }

    pub async fn fetch(&self, url: &str) -> Result<T, FetchError> {
        let token = self.begin();
        let bytes = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(FetchError::Cancelled),
            res = self.transport.get(url) => res?,
        };
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Fetches into `state`, mirroring `loading`/`error` the way a view reads them.
    pub async fn fetch_into(&self, url: &str, state: &mut FetchState<T>) {
        state.begin();
        let result = self.fetch(url).await;
        state.finish(result);
    }

    /// Cancels the in-flight request, if any.
    pub fn cancel(&self) {
        if let Some(token) = self
            .current
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            token.cancel();
        }
    }
}

impl<T, X> Drop for Fetcher<T, X> {
    fn drop(&mut self) {
        let current = self.current.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(token) = current.take() {
            token.cancel();
        }
    }
}

impl<T, X: fmt::Debug> fmt::Debug for Fetcher<T, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

/// Observable state of one fetched resource.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

impl<T> FetchState<T> {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Applies a result. Data from earlier successes is kept on failure; cancellations leave
    /// the error unset.
    pub fn finish(&mut self, result: Result<T, FetchError>) {
        match result {
            Ok(data) => self.data = Some(data),
            Err(err) if err.is_cancelled() => {}
            Err(err) => self.error = Some(err.to_string()),
        }
        self.loading = false;
    }
}
