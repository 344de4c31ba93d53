//! # gRPC Oracle Transport
//!
//! Client and server sides of the `namereg.RegistryOracle` gRPC service, built
//! on Protocol Buffers and the Tonic framework.
//!
//! ## Components
//!
//! - **OracleGrpc**: oracle service forwarding every request to a remote
//!   registry node
//! - **OracleHandler**: server handler exposing any local oracle service
//!
//! ## Not-Found Signalling
//!
//! A missing name or namespace travels as a `NOT_FOUND` status code, never as a
//! message to be parsed. The client turns that code back into
//! `NameNotFound`/`NamespaceNotFound` depending on what was asked; any other
//! status is a fault.
//!
//! ## Connection Management
//!
//! The client connects on first use and reuses the channel for every later
//! request. A failed connection attempt is not cached, the next request tries
//! again.

use std::{future::Future, pin::Pin, sync::Arc, task::Poll};

use tokio::sync::OnceCell;
use tonic::{Code, Request, Response, Status, transport::Channel};
use tower::{Service, ServiceExt};
#[cfg(feature = "namereg_tracing")]
use tracing::debug;

use crate::safety::{
    api::types::{NameRecord, NamespaceRecord, OracleRequest, OracleResponse},
    error::RegistryError,
};

/// Default port of a registry oracle gRPC endpoint.
pub const DEFAULT_ORACLE_PORT: u16 = 50061;

/// Protocol Buffer definitions for the registry oracle service.
pub mod proto {
    tonic::include_proto!("namereg");
}

use proto::{
    registry_oracle_client::RegistryOracleClient, registry_oracle_server::RegistryOracle,
};

/// Converts registry errors to gRPC status codes for wire transmission.
impl From<RegistryError> for Status {
    fn from(error: RegistryError) -> Self {
        if error.is_not_found() {
            return Status::not_found(error.to_string());
        }
        match error {
            RegistryError::OracleTimeout => Status::deadline_exceeded(error.to_string()),
            RegistryError::TransportFailedToContactOracle(_) | RegistryError::OracleTransport(_) => {
                Status::unavailable(error.to_string())
            }
            _ => Status::internal(error.to_string()),
        }
    }
}

/// Converts a status received for `request` back into a registry error.
fn status_to_error(status: Status, request: &OracleRequest) -> RegistryError {
    match (status.code(), request) {
        (Code::NotFound, OracleRequest::GetNameInfo(name))
        | (Code::NotFound, OracleRequest::GetGracePeriod(name)) => {
            RegistryError::NameNotFound(name.clone())
        }
        (Code::NotFound, OracleRequest::GetNamespaceInfo(namespace)) => {
            RegistryError::NamespaceNotFound(namespace.clone())
        }
        (Code::DeadlineExceeded, _) => RegistryError::OracleTimeout,
        (Code::Unavailable, _) => RegistryError::OracleTransport(status.message().to_string()),
        (code, _) => RegistryError::OracleProtocol(format!("{code:?}: {}", status.message())),
    }
}

/// gRPC client for a remote registry oracle.
#[derive(Debug, Clone)]
pub struct OracleGrpc {
    /// URI of the remote oracle, e.g. `http://[::1]:50061`.
    endpoint: String,
    /// Established connection, shared between clones.
    client: Arc<OnceCell<RegistryOracleClient<Channel>>>,
}

impl OracleGrpc {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), client: Arc::new(OnceCell::new()) }
    }

    /// URI this client connects to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Retrieves the cached client or establishes the connection.
    ///
    /// # Errors
    ///
    /// Returns `TransportFailedToContactOracle` if the connection cannot be established.
    async fn get_client_or_connect(&self) -> Result<RegistryOracleClient<Channel>, RegistryError> {
        self.client
            .get_or_try_init(|| async {
                #[cfg(feature = "namereg_tracing")]
                debug!("[oracle-grpc] connecting to {}", self.endpoint);
                RegistryOracleClient::connect(self.endpoint.clone())
                    .await
                    .map_err(|_| RegistryError::TransportFailedToContactOracle(self.endpoint.clone()))
            })
            .await
            .cloned()
    }
}

impl Service<OracleRequest> for OracleGrpc {
    type Response = OracleResponse;
    type Error = RegistryError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: OracleRequest) -> Self::Future {
        let this = self.clone();
        Box::pin(async move {
            let mut client = this.get_client_or_connect().await?;
            #[cfg(feature = "namereg_tracing")]
            debug!("[oracle-grpc] {:?}", request);
            match &request {
                OracleRequest::GetNameInfo(name) => {
                    let response = client
                        .get_name_info(Request::new(proto::NameQuery { name: name.clone() }))
                        .await
                        .map_err(|status| status_to_error(status, &request))?
                        .into_inner();
                    Ok(OracleResponse::NameInfo(NameRecord {
                        address: response.address,
                        expire_block: response.expire_block,
                    }))
                }
                OracleRequest::GetNamespaceInfo(namespace) => {
                    let response = client
                        .get_namespace_info(Request::new(proto::NamespaceQuery {
                            namespace_id: namespace.clone(),
                        }))
                        .await
                        .map_err(|status| status_to_error(status, &request))?
                        .into_inner();
                    Ok(OracleResponse::NamespaceInfo(NamespaceRecord {
                        recipient_address: response.recipient_address,
                        ready: response.ready,
                    }))
                }
                OracleRequest::GetBlockHeight => {
                    let response = client
                        .get_block_height(Request::new(proto::Empty {}))
                        .await
                        .map_err(|status| status_to_error(status, &request))?
                        .into_inner();
                    Ok(OracleResponse::BlockHeight(response.height))
                }
                OracleRequest::GetGracePeriod(name) => {
                    let response = client
                        .get_grace_period(Request::new(proto::NameQuery { name: name.clone() }))
                        .await
                        .map_err(|status| status_to_error(status, &request))?
                        .into_inner();
                    Ok(OracleResponse::GracePeriod(response.blocks))
                }
                OracleRequest::GetNamesOwned(address) => {
                    let response = client
                        .get_names_owned(Request::new(proto::AddressQuery {
                            address: address.clone(),
                        }))
                        .await
                        .map_err(|status| status_to_error(status, &request))?
                        .into_inner();
                    Ok(OracleResponse::NamesOwned(response.names))
                }
            }
        })
    }
}

/// gRPC server handler exposing a local oracle service.
///
/// Translates incoming Protocol Buffer requests into [`OracleRequest`]s, calls
/// the wrapped oracle and converts its answer back. Oracle errors are sent as
/// status codes, see the `From<RegistryError> for Status` conversion.
pub struct OracleHandler<O> {
    oracle: O,
}

impl<O> OracleHandler<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }
}

fn unexpected_response() -> Status {
    Status::internal(RegistryError::UnexpectedOracleResponse.to_string())
}

#[tonic::async_trait]
impl<O> RegistryOracle for OracleHandler<O>
where
    O: Service<OracleRequest, Response = OracleResponse, Error = RegistryError>
        + Clone
        + Send
        + Sync
        + 'static,
    O::Future: Send,
{
    async fn get_name_info(
        &self,
        request: Request<proto::NameQuery>,
    ) -> Result<Response<proto::NameInfo>, Status> {
        let req = request.into_inner();
        match self.oracle.clone().oneshot(OracleRequest::GetNameInfo(req.name)).await? {
            OracleResponse::NameInfo(record) => Ok(Response::new(proto::NameInfo {
                address: record.address,
                expire_block: record.expire_block,
            })),
            _ => Err(unexpected_response()),
        }
    }

    async fn get_namespace_info(
        &self,
        request: Request<proto::NamespaceQuery>,
    ) -> Result<Response<proto::NamespaceInfo>, Status> {
        let req = request.into_inner();
        match self.oracle.clone().oneshot(OracleRequest::GetNamespaceInfo(req.namespace_id)).await?
        {
            OracleResponse::NamespaceInfo(record) => Ok(Response::new(proto::NamespaceInfo {
                recipient_address: record.recipient_address,
                ready: record.ready,
            })),
            _ => Err(unexpected_response()),
        }
    }

    async fn get_block_height(
        &self,
        _request: Request<proto::Empty>,
    ) -> Result<Response<proto::BlockHeight>, Status> {
        match self.oracle.clone().oneshot(OracleRequest::GetBlockHeight).await? {
            OracleResponse::BlockHeight(height) => {
                Ok(Response::new(proto::BlockHeight { height }))
            }
            _ => Err(unexpected_response()),
        }
    }

    async fn get_grace_period(
        &self,
        request: Request<proto::NameQuery>,
    ) -> Result<Response<proto::GracePeriod>, Status> {
        let req = request.into_inner();
        match self.oracle.clone().oneshot(OracleRequest::GetGracePeriod(req.name)).await? {
            OracleResponse::GracePeriod(blocks) => {
                Ok(Response::new(proto::GracePeriod { blocks }))
            }
            _ => Err(unexpected_response()),
        }
    }

    async fn get_names_owned(
        &self,
        request: Request<proto::AddressQuery>,
    ) -> Result<Response<proto::NamesOwned>, Status> {
        let req = request.into_inner();
        match self.oracle.clone().oneshot(OracleRequest::GetNamesOwned(req.address)).await? {
            OracleResponse::NamesOwned(names) => Ok(Response::new(proto::NamesOwned { names })),
            _ => Err(unexpected_response()),
        }
    }
}
