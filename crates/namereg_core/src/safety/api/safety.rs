//! Safety API service implementation.
//!
//! `SafetyApiService` is the single entry point a registration or transfer
//! workflow talks to. It answers every [`SafetyRequest`] with a
//! [`SafetyResponse::Decision`]:
//!
//! - **Validity** (`IsNameValid`, `IsNamespaceValid`) is decided locally by the
//!   [`NameValidator`], without touching the oracle.
//! - **Registry predicates** (availability, ownership, namespace lifecycle,
//!   grace period, transfer cap) are delegated to the [`PredicateService`].
//!
//! Oracle faults surface as the service error; not-found answers never do.
//!
//! [`NameValidator`]: crate::safety::infrastructure::validation::NameValidator

use std::{future::Future, pin::Pin, task::Poll};

use tower::Service;
#[cfg(feature = "namereg_tracing")]
use tracing::info;

use crate::safety::{
    api::types::{OracleRequest, OracleResponse, SafetyRequest, SafetyResponse},
    error::RegistryError,
    services::predicates::PredicateService,
};

/// Safety API service over an oracle `O`.
#[derive(Debug, Clone)]
pub struct SafetyApiService<O> {
    /// Registry predicates, holding the oracle handle
    predicates: PredicateService<O>,
}

impl<O> SafetyApiService<O> {
    pub fn new(oracle: O) -> Self {
        Self { predicates: PredicateService::new(oracle) }
    }

    /// Access the underlying predicates, for callers that prefer plain async methods.
    pub fn predicates(&self) -> &PredicateService<O> {
        &self.predicates
    }
}

impl<O> Service<SafetyRequest> for SafetyApiService<O>
where
    O: Service<OracleRequest, Response = OracleResponse, Error = RegistryError>
        + Clone
        + Send
        + Sync
        + 'static,
    O::Future: Send,
{
    type Response = SafetyResponse;
    type Error = RegistryError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: SafetyRequest) -> Self::Future {
        let predicates = self.predicates.clone();
        Box::pin(async move {
            let decision = match request {
                SafetyRequest::IsNameValid(name) => {
                    #[cfg(feature = "namereg_tracing")]
                    info!("[safety] IsNameValid: name: {}", name);
                    predicates.validator().is_name_valid(&name)
                }
                SafetyRequest::IsNamespaceValid(namespace) => {
                    #[cfg(feature = "namereg_tracing")]
                    info!("[safety] IsNamespaceValid: namespace: {}", namespace);
                    predicates.validator().is_namespace_valid(&namespace)
                }
                SafetyRequest::IsNameAvailable(name) => {
                    #[cfg(feature = "namereg_tracing")]
                    info!("[safety] IsNameAvailable: name: {}", name);
                    predicates.is_name_available(&name).await?
                }
                SafetyRequest::IsNamespaceAvailable(namespace) => {
                    #[cfg(feature = "namereg_tracing")]
                    info!("[safety] IsNamespaceAvailable: namespace: {}", namespace);
                    predicates.is_namespace_available(&namespace).await?
                }
                SafetyRequest::OwnsName { name, address } => {
                    #[cfg(feature = "namereg_tracing")]
                    info!("[safety] OwnsName: name: {}, address: {}", name, address);
                    predicates.owns_name(&name, &address).await?
                }
                SafetyRequest::RevealedNamespace { namespace, address } => {
                    #[cfg(feature = "namereg_tracing")]
                    info!(
                        "[safety] RevealedNamespace: namespace: {}, address: {}",
                        namespace, address
                    );
                    predicates.revealed_namespace(&namespace, &address).await?
                }
                SafetyRequest::NamespaceIsReady(namespace) => {
                    #[cfg(feature = "namereg_tracing")]
                    info!("[safety] NamespaceIsReady: namespace: {}", namespace);
                    predicates.namespace_is_ready(&namespace).await?
                }
                SafetyRequest::NamespaceIsRevealed(namespace) => {
                    #[cfg(feature = "namereg_tracing")]
                    info!("[safety] NamespaceIsRevealed: namespace: {}", namespace);
                    predicates.namespace_is_revealed(&namespace).await?
                }
                SafetyRequest::IsInGracePeriod(name) => {
                    #[cfg(feature = "namereg_tracing")]
                    info!("[safety] IsInGracePeriod: name: {}", name);
                    predicates.is_in_grace_period(&name).await?
                }
                SafetyRequest::AddressCanReceiveName(address) => {
                    #[cfg(feature = "namereg_tracing")]
                    info!("[safety] AddressCanReceiveName: address: {}", address);
                    predicates.address_can_receive_name(&address).await?
                }
            };
            Ok(SafetyResponse::Decision(decision))
        })
    }
}
