//! Safety module.
//!
//! Decides whether registry operations on names and namespaces are safe to
//! attempt, from syntactic rules and from oracle-provided registry state.
//!
//! ## Components
//!
//! ### Infrastructure
//! - **Validation**: syntactic rules for fully qualified names and namespace
//!   identifiers; pure, never touches the oracle
//!
//! ### Services
//! - **Predicates**: availability, ownership, namespace lifecycle, grace period
//!   and transfer-cap decisions, each derived from one round of oracle calls
//!
//! ### API
//! - **Safety API**: one `tower::Service<SafetyRequest>` exposing every
//!   decision, so it can be layered, boxed or served like any other service
//! - **Error handling**: [`error::RegistryError`], whose not-found kinds are
//!   absorbed by the predicates and whose fault kinds always reach the caller
//!
//! ## Initialization Helpers
//!
//! - `init_safety()`: safety API directly over an oracle
//! - `init_safety_with_timeout()`: same, with a deadline on every oracle call

use crate::oracle::timeout::{OracleTimeout, OracleTimeoutLayer};

pub mod api;
pub mod error;
pub mod infrastructure;
pub mod services;

/// Safety API stack whose oracle calls are bounded by a timeout.
pub type SafetyTimeoutStack<O> = api::safety::SafetyApiService<OracleTimeout<O>>;

/// Initialize the safety API over an oracle.
///
/// # Type Parameters
/// * `O` - oracle service answering [`api::OracleRequest`]s
pub fn init_safety<O>(oracle: O) -> api::safety::SafetyApiService<O>
where
    O: tower::Service<api::OracleRequest, Response = api::OracleResponse, Error = error::RegistryError>
        + Clone
        + Send
        + Sync
        + 'static,
    O::Future: Send,
{
    api::safety::SafetyApiService::new(oracle)
}

/// Initialize the safety API with a per-call oracle timeout.
///
/// # Arguments
/// * `oracle` - oracle service answering [`api::OracleRequest`]s
/// * `timeout_ms` - deadline applied to each oracle call, in milliseconds;
///   `0` disables the deadline
///
/// An oracle call exceeding the deadline fails with
/// [`error::RegistryError::OracleTimeout`].
pub fn init_safety_with_timeout<O>(oracle: O, timeout_ms: u64) -> SafetyTimeoutStack<O>
where
    O: tower::Service<api::OracleRequest, Response = api::OracleResponse, Error = error::RegistryError>
        + Clone
        + Send
        + Sync
        + 'static,
    O::Future: Send,
{
    let oracle = tower::ServiceBuilder::new()
        .layer(OracleTimeoutLayer::from_millis(timeout_ms))
        .service(oracle);
    api::safety::SafetyApiService::new(oracle)
}
