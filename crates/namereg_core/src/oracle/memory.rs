//! # In-Memory Oracle
//!
//! Registry snapshot held in process memory, answering oracle requests the way
//! a remote registry node would. It backs unit and integration tests, the
//! benchmarks, and the gRPC server in tests.
//!
//! ## Features
//!
//! - **Registry State**: names, namespaces, block height, grace periods
//! - **Fault Injection**: make one kind of call fail with a chosen error
//! - **Latency Simulation**: fixed delay before every answer
//! - **Call Accounting**: count of requests served, to observe that nothing
//!   upstream caches answers
//!
//! Clones share the same registry state.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        Arc,
        atomic::{AtomicU64, AtomicUsize, Ordering},
    },
    task::Poll,
    time::Duration,
};

use dashmap::DashMap;
use tower::Service;
#[cfg(feature = "namereg_tracing")]
use tracing::debug;

use crate::{
    oracle::{OracleCall, namespace_of},
    safety::{
        api::{
            BlockHeight, GracePeriod, NameRecord, NamespaceRecord, OracleRequest, OracleResponse,
        },
        error::RegistryError,
    },
};

/// Grace period applied to names whose namespace has no override.
pub const DEFAULT_GRACE_PERIOD: GracePeriod = 5000;

#[derive(Debug, Clone)]
pub struct InMemoryOracle {
    /// Name records indexed by fully qualified name.
    names: Arc<DashMap<String, NameRecord>>,
    /// Namespace records indexed by namespace identifier.
    namespaces: Arc<DashMap<String, NamespaceRecord>>,
    block_height: Arc<AtomicU64>,
    default_grace_period: Arc<AtomicU64>,
    /// Grace period overrides indexed by namespace identifier.
    grace_periods: Arc<DashMap<String, GracePeriod>>,
    /// Errors returned instead of answering, per call kind.
    faults: Arc<DashMap<OracleCall, RegistryError>>,
    calls: Arc<AtomicUsize>,
    /// Delay before every answer in milliseconds.
    base_delay_ms: u64,
}

impl Default for InMemoryOracle {
    fn default() -> Self {
        Self::with_delay(0)
    }
}

impl InMemoryOracle {
    /// Creates an empty registry answering after `base_delay_ms` milliseconds.
    pub fn with_delay(base_delay_ms: u64) -> Self {
        Self {
            names: Arc::new(DashMap::new()),
            namespaces: Arc::new(DashMap::new()),
            block_height: Arc::new(AtomicU64::new(0)),
            default_grace_period: Arc::new(AtomicU64::new(DEFAULT_GRACE_PERIOD)),
            grace_periods: Arc::new(DashMap::new()),
            faults: Arc::new(DashMap::new()),
            calls: Arc::new(AtomicUsize::new(0)),
            base_delay_ms,
        }
    }

    /// Registers or replaces a name record.
    ///
    /// The name is stored verbatim, malformed names included.
    pub fn register_name(&self, name: impl Into<String>, record: NameRecord) {
        self.names.insert(name.into(), record);
    }

    /// Removes a name, returning its record if it was registered.
    pub fn remove_name(&self, name: &str) -> Option<NameRecord> {
        self.names.remove(name).map(|(_, record)| record)
    }

    /// Registers or replaces a namespace record.
    pub fn register_namespace(&self, namespace_id: impl Into<String>, record: NamespaceRecord) {
        self.namespaces.insert(namespace_id.into(), record);
    }

    /// Marks a revealed namespace as ready.
    ///
    /// # Returns
    /// `false` if the namespace does not exist.
    pub fn launch_namespace(&self, namespace_id: &str) -> bool {
        match self.namespaces.get_mut(namespace_id) {
            Some(mut record) => {
                record.ready = true;
                true
            }
            None => false,
        }
    }

    pub fn set_block_height(&self, height: BlockHeight) {
        self.block_height.store(height, Ordering::SeqCst);
    }

    /// Advances the chain by `blocks` and returns the new height.
    pub fn advance_blocks(&self, blocks: u64) -> BlockHeight {
        self.block_height.fetch_add(blocks, Ordering::SeqCst) + blocks
    }

    pub fn set_default_grace_period(&self, blocks: GracePeriod) {
        self.default_grace_period.store(blocks, Ordering::SeqCst);
    }

    /// Overrides the grace period of every name in `namespace_id`.
    pub fn set_namespace_grace_period(&self, namespace_id: impl Into<String>, blocks: GracePeriod) {
        self.grace_periods.insert(namespace_id.into(), blocks);
    }

    /// Makes every call of kind `call` fail with `error` until cleared.
    pub fn inject_fault(&self, call: OracleCall, error: RegistryError) {
        self.faults.insert(call, error);
    }

    pub fn clear_faults(&self) {
        self.faults.clear();
    }

    /// Number of requests received so far, failed ones included.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn grace_period(&self, name: &str) -> GracePeriod {
        namespace_of(name)
            .and_then(|namespace| self.grace_periods.get(namespace).map(|blocks| *blocks))
            .unwrap_or_else(|| self.default_grace_period.load(Ordering::SeqCst))
    }

    /// Names owned by `address`, in lexicographic order.
    fn names_owned(&self, address: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .names
            .iter()
            .filter(|entry| entry.value().address == address)
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    fn answer(&self, request: OracleRequest) -> Result<OracleResponse, RegistryError> {
        if let Some(fault) = self.faults.get(&OracleCall::from(&request)) {
            return Err(fault.value().clone());
        }
        match request {
            OracleRequest::GetNameInfo(name) => match self.names.get(&name) {
                Some(record) => Ok(OracleResponse::NameInfo(record.value().clone())),
                None => Err(RegistryError::NameNotFound(name)),
            },
            OracleRequest::GetNamespaceInfo(namespace) => match self.namespaces.get(&namespace) {
                Some(record) => Ok(OracleResponse::NamespaceInfo(record.value().clone())),
                None => Err(RegistryError::NamespaceNotFound(namespace)),
            },
            OracleRequest::GetBlockHeight => {
                Ok(OracleResponse::BlockHeight(self.block_height.load(Ordering::SeqCst)))
            }
            OracleRequest::GetGracePeriod(name) => {
                Ok(OracleResponse::GracePeriod(self.grace_period(&name)))
            }
            OracleRequest::GetNamesOwned(address) => {
                Ok(OracleResponse::NamesOwned(self.names_owned(&address)))
            }
        }
    }
}

impl Service<OracleRequest> for InMemoryOracle {
    type Response = OracleResponse;
    type Error = RegistryError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: OracleRequest) -> Self::Future {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let this = self.clone();
        Box::pin(async move {
            if this.base_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(this.base_delay_ms)).await;
            }
            #[cfg(feature = "namereg_tracing")]
            debug!("[oracle-memory] {:?}", request);
            this.answer(request)
        })
    }
}
