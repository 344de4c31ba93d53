//! Validation and eligibility engine for a ledger-backed naming registry.
//!
//! This crate answers yes/no questions about names (`<label>.<namespace>`),
//! namespaces and addresses: is a name well formed, is it available, who owns
//! it, is it inside its renewal grace period, is a namespace ready, can an
//! address receive one more name. Syntactic rules are evaluated locally, every
//! other decision is derived from records served by a registry oracle.
//!
//! The oracle is any [`tower::Service`] speaking
//! [`OracleRequest`](safety::api::OracleRequest). The [`oracle`] module ships
//! an in-memory registry, a no-op oracle, a gRPC client/server pair built on
//! [`tonic`], and a timeout layer.
//!
//! [`tonic`]: https://docs.rs/tonic

#[cfg(test)]
mod tests;

pub mod oracle;
pub mod safety;

#[cfg(feature = "namereg_tracing")]
pub mod namereg_tracing {
    use std::sync::Once;
    use tracing_subscriber::{EnvFilter, fmt, fmt::MakeWriter};

    static INIT: Once = Once::new();

    /// `RUST_LOG` filter, logging is off when the variable is unset.
    fn env_filter() -> EnvFilter {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("off")).unwrap_or_default()
    }

    /// Fmt subscriber writing records to `writer`.
    pub fn subscriber<W>(writer: W, filter: EnvFilter) -> impl tracing::Subscriber + Send + Sync
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        fmt().with_target(false).with_writer(writer).with_env_filter(filter).finish()
    }

    /// Initialize tracing for tests, records go through the libtest capture.
    ///
    /// Safe to call several times, only the first call has an effect.
    pub fn init() {
        INIT.call_once(|| {
            fmt().with_target(false).with_test_writer().with_env_filter(env_filter()).init();
        });
    }

    /// Initialize tracing with records written to `writer`.
    ///
    /// Binaries whose stdout carries their output pass `std::io::stderr`.
    pub fn init_with_writer<W>(writer: W)
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        INIT.call_once(|| {
            let _ = tracing::subscriber::set_global_default(subscriber(writer, env_filter()));
        });
    }

}
