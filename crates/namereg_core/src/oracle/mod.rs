//! Registry oracle adapters.
//!
//! The safety engine depends on one boundary: a `tower::Service` answering
//! [`OracleRequest`]s. Adapters provided here:
//!
//! - [`memory::InMemoryOracle`]: registry snapshot held in memory, with fault
//!   injection and latency simulation for tests
//! - [`nop::OracleNop`]: empty registry
//! - [`grpc::OracleGrpc`] / [`grpc::OracleHandler`]: client and server sides of
//!   the `namereg.RegistryOracle` gRPC service
//! - [`timeout::OracleTimeoutLayer`]: per-call deadline around any oracle

use crate::safety::api::OracleRequest;

pub mod grpc;
pub mod memory;
pub mod nop;
pub mod timeout;

/// Namespace part of a fully qualified name, if it has one.
///
/// Used by adapters that key settings per namespace.
pub fn namespace_of(fully_qualified_name: &str) -> Option<&str> {
    fully_qualified_name.rsplit_once('.').map(|(_, namespace)| namespace)
}

/// Kind of oracle call, without its argument.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum OracleCall {
    NameInfo,
    NamespaceInfo,
    BlockHeight,
    GracePeriod,
    NamesOwned,
}

impl From<&OracleRequest> for OracleCall {
    fn from(request: &OracleRequest) -> Self {
        match request {
            OracleRequest::GetNameInfo(_) => Self::NameInfo,
            OracleRequest::GetNamespaceInfo(_) => Self::NamespaceInfo,
            OracleRequest::GetBlockHeight => Self::BlockHeight,
            OracleRequest::GetGracePeriod(_) => Self::GracePeriod,
            OracleRequest::GetNamesOwned(_) => Self::NamesOwned,
        }
    }
}
