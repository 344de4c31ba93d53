//! Per-call deadline for oracle services.
//!
//! `tower::timeout` boxes its errors; this layer keeps the oracle error type so
//! an expired deadline reaches the caller as [`RegistryError::OracleTimeout`]
//! and a not-found answer keeps its structured kind. A zero deadline disables
//! the timeout.

use std::{future::Future, pin::Pin, task::Poll, time::Duration};

use tower::{Layer, Service};
#[cfg(feature = "namereg_tracing")]
use tracing::debug;

use crate::safety::{
    api::{OracleRequest, OracleResponse},
    error::RegistryError,
};

/// Layer wrapping an oracle in [`OracleTimeout`].
#[derive(Debug, Clone, Copy)]
pub struct OracleTimeoutLayer {
    timeout: Option<Duration>,
}

impl OracleTimeoutLayer {
    /// Deadline of `timeout` per call, none when `timeout` is zero.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout: (!timeout.is_zero()).then_some(timeout) }
    }

    pub fn from_millis(timeout_ms: u64) -> Self {
        Self::new(Duration::from_millis(timeout_ms))
    }
}

impl<S> Layer<S> for OracleTimeoutLayer {
    type Service = OracleTimeout<S>;

    fn layer(&self, inner: S) -> Self::Service {
        OracleTimeout { inner, timeout: self.timeout }
    }
}

/// Oracle service failing calls that outlive `timeout`.
#[derive(Debug, Clone)]
pub struct OracleTimeout<S> {
    inner: S,
    timeout: Option<Duration>,
}

impl<S> Service<OracleRequest> for OracleTimeout<S>
where
    S: Service<OracleRequest, Response = OracleResponse, Error = RegistryError>,
    S::Future: Send + 'static,
{
    type Response = OracleResponse;
    type Error = RegistryError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: OracleRequest) -> Self::Future {
        let timeout = self.timeout;
        #[cfg(feature = "namereg_tracing")]
        let call = crate::oracle::OracleCall::from(&request);
        let response = self.inner.call(request);
        Box::pin(async move {
            let Some(timeout) = timeout else {
                return response.await;
            };
            match tokio::time::timeout(timeout, response).await {
                Ok(result) => result,
                Err(_) => {
                    #[cfg(feature = "namereg_tracing")]
                    debug!("[oracle-timeout] {:?} exceeded {:?}", call, timeout);
                    Err(RegistryError::OracleTimeout)
                }
            }
        })
    }
}
