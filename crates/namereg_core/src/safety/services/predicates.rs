//! Registry predicates derived from oracle records.
//!
//! Each predicate issues at most one round of oracle calls and reduces the
//! answer to a boolean. A not-found answer for the entity a predicate looked up
//! is turned into that predicate's fallback value; every other error is
//! returned untouched. Nothing is cached, so two calls may observe different
//! registry states.
use futures::future::try_join3;
use tower::{Service, ServiceExt};
#[cfg(feature = "namereg_tracing")]
use tracing::debug;

use crate::safety::{
    api::types::{
        BlockHeight, GracePeriod, NameRecord, NamespaceRecord, OracleRequest, OracleResponse,
    },
    error::RegistryError,
    infrastructure::validation::NameValidator,
};

/// Number of valid names an address may hold before it stops accepting
/// transfers.
pub const MAX_NAMES_PER_ADDRESS: usize = 25;

/// Replaces a `NameNotFound` error with `fallback`.
fn or_name_not_found(
    result: Result<bool, RegistryError>,
    fallback: bool,
) -> Result<bool, RegistryError> {
    match result {
        Err(RegistryError::NameNotFound(_name)) => {
            #[cfg(feature = "namereg_tracing")]
            debug!("[predicates] name not found: {}, falling back to {}", _name, fallback);
            Ok(fallback)
        }
        other => other,
    }
}

/// Replaces a `NamespaceNotFound` error with `fallback`.
fn or_namespace_not_found(
    result: Result<bool, RegistryError>,
    fallback: bool,
) -> Result<bool, RegistryError> {
    match result {
        Err(RegistryError::NamespaceNotFound(_namespace)) => {
            #[cfg(feature = "namereg_tracing")]
            debug!("[predicates] namespace not found: {}, falling back to {}", _namespace, fallback);
            Ok(fallback)
        }
        other => other,
    }
}

/// Predicates over the registry state served by an oracle `O`.
///
/// The oracle is cloned for every call, so independent lookups can run
/// concurrently on the same handle.
#[derive(Debug, Clone)]
pub struct PredicateService<O> {
    oracle: O,
    validator: NameValidator,
}

impl<O> PredicateService<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle, validator: NameValidator }
    }

    pub fn validator(&self) -> &NameValidator {
        &self.validator
    }
}

impl<O> PredicateService<O>
where
    O: Service<OracleRequest, Response = OracleResponse, Error = RegistryError>
        + Clone
        + Send
        + Sync
        + 'static,
    O::Future: Send,
{
    async fn query(&self, request: OracleRequest) -> Result<OracleResponse, RegistryError> {
        self.oracle.clone().oneshot(request).await
    }

    async fn name_info(&self, name: &str) -> Result<NameRecord, RegistryError> {
        match self.query(OracleRequest::GetNameInfo(name.to_owned())).await? {
            OracleResponse::NameInfo(record) => Ok(record),
            _ => Err(RegistryError::UnexpectedOracleResponse),
        }
    }

    async fn namespace_info(&self, namespace_id: &str) -> Result<NamespaceRecord, RegistryError> {
        match self.query(OracleRequest::GetNamespaceInfo(namespace_id.to_owned())).await? {
            OracleResponse::NamespaceInfo(record) => Ok(record),
            _ => Err(RegistryError::UnexpectedOracleResponse),
        }
    }

    async fn block_height(&self) -> Result<BlockHeight, RegistryError> {
        match self.query(OracleRequest::GetBlockHeight).await? {
            OracleResponse::BlockHeight(height) => Ok(height),
            _ => Err(RegistryError::UnexpectedOracleResponse),
        }
    }

    async fn grace_period(&self, name: &str) -> Result<GracePeriod, RegistryError> {
        match self.query(OracleRequest::GetGracePeriod(name.to_owned())).await? {
            OracleResponse::GracePeriod(blocks) => Ok(blocks),
            _ => Err(RegistryError::UnexpectedOracleResponse),
        }
    }

    async fn names_owned(&self, address: &str) -> Result<Vec<String>, RegistryError> {
        match self.query(OracleRequest::GetNamesOwned(address.to_owned())).await? {
            OracleResponse::NamesOwned(names) => Ok(names),
            _ => Err(RegistryError::UnexpectedOracleResponse),
        }
    }

    /// True if the name is not registered.
    pub async fn is_name_available(&self, name: &str) -> Result<bool, RegistryError> {
        or_name_not_found(self.name_info(name).await.map(|_| false), true)
    }

    /// True if the namespace does not exist.
    pub async fn is_namespace_available(&self, namespace_id: &str) -> Result<bool, RegistryError> {
        or_namespace_not_found(self.namespace_info(namespace_id).await.map(|_| false), true)
    }

    /// True if `address` is the registered owner of `name`.
    pub async fn owns_name(&self, name: &str, address: &str) -> Result<bool, RegistryError> {
        or_name_not_found(
            self.name_info(name).await.map(|record| record.address == address),
            false,
        )
    }

    /// True if `address` is the recipient that revealed `namespace_id`.
    pub async fn revealed_namespace(
        &self,
        namespace_id: &str,
        address: &str,
    ) -> Result<bool, RegistryError> {
        or_namespace_not_found(
            self.namespace_info(namespace_id)
                .await
                .map(|record| record.recipient_address == address),
            false,
        )
    }

    /// True if the namespace exists and has been launched.
    pub async fn namespace_is_ready(&self, namespace_id: &str) -> Result<bool, RegistryError> {
        or_namespace_not_found(self.namespace_info(namespace_id).await.map(|record| record.ready), false)
    }

    /// True if the namespace exists and has not been launched yet.
    ///
    /// Not the complement of [`Self::namespace_is_ready`]: both are `false`
    /// for a namespace that does not exist.
    pub async fn namespace_is_revealed(&self, namespace_id: &str) -> Result<bool, RegistryError> {
        or_namespace_not_found(
            self.namespace_info(namespace_id).await.map(|record| !record.ready),
            false,
        )
    }

    /// True if the name has expired and the grace period has not elapsed yet.
    ///
    /// The name record, the block height and the grace period are fetched
    /// concurrently. The first failing call aborts the others.
    pub async fn is_in_grace_period(&self, name: &str) -> Result<bool, RegistryError> {
        let facts = try_join3(self.name_info(name), self.block_height(), self.grace_period(name))
            .await
            .map(|(record, height, grace_period)| {
                height >= record.expire_block
                    && height < record.expire_block.saturating_add(grace_period)
            });
        or_name_not_found(facts, false)
    }

    /// True if `address` holds fewer than [`MAX_NAMES_PER_ADDRESS`] valid names.
    ///
    /// Owned names failing [`NameValidator::is_name_valid`] do not count.
    pub async fn address_can_receive_name(&self, address: &str) -> Result<bool, RegistryError> {
        let names = self.names_owned(address).await?;
        let valid_names = names.iter().filter(|name| self.validator.is_name_valid(name)).count();
        #[cfg(feature = "namereg_tracing")]
        debug!(
            "[predicates] address {} owns {} names, {} valid",
            address,
            names.len(),
            valid_names
        );
        Ok(valid_names < MAX_NAMES_PER_ADDRESS)
    }
}
