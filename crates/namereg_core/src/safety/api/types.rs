//! Safety API type definitions.
//!
//! Two request/response pairs live here:
//!
//! ## Oracle API
//! What the engine asks of the registry oracle. Every oracle adapter (in-memory,
//! gRPC, no-op) is a `tower::Service<OracleRequest>` answering with the
//! matching [`OracleResponse`] variant, or a [`RegistryError`] whose
//! not-found kinds are valid negative answers.
//!
//! ## Safety API
//! What callers ask of the engine. Every [`SafetyRequest`] resolves to a
//! [`SafetyResponse::Decision`].
//!
//! [`RegistryError`]: crate::safety::error::RegistryError

/// Opaque identifier of a ledger account.
pub type Address = String;

/// Ledger height, non-decreasing over the life of the chain.
pub type BlockHeight = u64;

/// Number of blocks after expiry during which a name can only be renewed.
pub type GracePeriod = u64;

/// Name record as served by the oracle.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct NameRecord {
    /// Owning address
    pub address: Address,
    /// Height at which the name expires
    pub expire_block: BlockHeight,
}

impl NameRecord {
    pub fn new(address: impl Into<Address>, expire_block: BlockHeight) -> Self {
        Self { address: address.into(), expire_block }
    }
}

/// Namespace record as served by the oracle.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct NamespaceRecord {
    /// Address that revealed the namespace
    pub recipient_address: Address,
    /// True once the namespace has been launched
    pub ready: bool,
}

impl NamespaceRecord {
    /// A namespace that has been revealed but not launched yet.
    pub fn revealed(recipient_address: impl Into<Address>) -> Self {
        Self { recipient_address: recipient_address.into(), ready: false }
    }

    /// A launched namespace.
    pub fn ready(recipient_address: impl Into<Address>) -> Self {
        Self { recipient_address: recipient_address.into(), ready: true }
    }
}

/// Registry oracle request types.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OracleRequest {
    /// Fetch the record of a fully qualified name.
    ///
    /// Fails with `NameNotFound` when the name is not registered.
    GetNameInfo(String),
    /// Fetch the record of a namespace.
    ///
    /// Fails with `NamespaceNotFound` when the namespace does not exist.
    GetNamespaceInfo(String),
    /// Fetch the current block height.
    GetBlockHeight,
    /// Fetch the grace period applying to a fully qualified name.
    GetGracePeriod(String),
    /// List the names currently owned by an address.
    GetNamesOwned(Address),
}

/// Registry oracle response types.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OracleResponse {
    NameInfo(NameRecord),
    NamespaceInfo(NamespaceRecord),
    BlockHeight(BlockHeight),
    GracePeriod(GracePeriod),
    /// Names in the order the oracle lists them
    NamesOwned(Vec<String>),
}

/// Safety API request types.
///
/// One variant per question the engine can answer. The two validity checks
/// never reach the oracle.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SafetyRequest {
    /// Is the fully qualified name syntactically valid?
    IsNameValid(String),
    /// Is the namespace identifier syntactically valid?
    IsNamespaceValid(String),
    /// Is the name unregistered?
    IsNameAvailable(String),
    /// Is the namespace unregistered?
    IsNamespaceAvailable(String),
    /// Does `address` own `name`?
    OwnsName { name: String, address: Address },
    /// Did `address` reveal `namespace`?
    RevealedNamespace { namespace: String, address: Address },
    /// Has the namespace been launched?
    NamespaceIsReady(String),
    /// Has the namespace been revealed without being launched yet?
    NamespaceIsRevealed(String),
    /// Has the name expired less than one grace period ago?
    IsInGracePeriod(String),
    /// Does the address hold fewer valid names than the transfer cap?
    AddressCanReceiveName(Address),
}

/// Safety API response types.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SafetyResponse {
    Decision(bool),
}
