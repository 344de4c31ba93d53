use std::{pin::Pin, task::Poll};

use tower::Service;

use crate::safety::{
    api::{OracleRequest, OracleResponse},
    error::RegistryError,
};

/// Oracle over an empty registry at height 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleNop;

impl Service<OracleRequest> for OracleNop {
    type Response = OracleResponse;
    type Error = RegistryError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: OracleRequest) -> Self::Future {
        Box::pin(async move {
            match request {
                OracleRequest::GetNameInfo(name) => Err(RegistryError::NameNotFound(name)),
                OracleRequest::GetNamespaceInfo(namespace) => {
                    Err(RegistryError::NamespaceNotFound(namespace))
                }
                OracleRequest::GetBlockHeight => Ok(OracleResponse::BlockHeight(0)),
                OracleRequest::GetGracePeriod(_) => Ok(OracleResponse::GracePeriod(0)),
                OracleRequest::GetNamesOwned(_) => Ok(OracleResponse::NamesOwned(Vec::new())),
            }
        })
    }
}
