use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum RegistryError {
    #[error("Registry error, name not found (name: {0})")]
    NameNotFound(String),

    #[error("Registry error, namespace not found (namespace: {0})")]
    NamespaceNotFound(String),

    #[error("Registry error, failed to contact oracle (endpoint: {0})")]
    TransportFailedToContactOracle(String),

    #[error("Registry error, oracle transport failure ({0})")]
    OracleTransport(String),

    #[error("Registry error, oracle protocol failure ({0})")]
    OracleProtocol(String),

    #[error("Registry error, unexpected oracle response")]
    UnexpectedOracleResponse,

    #[error("Registry error, oracle request timed out")]
    OracleTimeout,
}

impl RegistryError {
    /// Whether the error only reports a missing name or namespace.
    ///
    /// Such errors carry a valid negative answer from the registry and travel
    /// over gRPC as `NOT_FOUND`, every other variant is a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NameNotFound(_) | Self::NamespaceNotFound(_))
    }
}
