//! Command-line front-end of the name registry safety engine.
//!
//! Answers one question per invocation and prints `true` or `false`:
//!
//! ```bash
//! namereg --endpoint http://10.0.0.1:50061 name-available alice.id
//! namereg in-grace-period alice.id
//! namereg name-valid Alice.id
//! ```
//!
//! Validity checks are answered locally, every other command queries the
//! registry oracle over gRPC.

use std::io::Write;

use clap::{Parser, Subcommand};
use namereg_core::{
    oracle::grpc::{DEFAULT_ORACLE_PORT, OracleGrpc},
    safety::{
        api::{SafetyRequest, SafetyResponse},
        init_safety_with_timeout,
    },
};
use tower::ServiceExt;

fn default_endpoint() -> String {
    format!("http://[::1]:{DEFAULT_ORACLE_PORT}")
}

#[derive(Parser, Debug)]
#[command(name = "namereg")]
#[command(about = "Name registry safety checks")]
struct NameregArgs {
    /// Registry oracle gRPC endpoint
    #[arg(short, long, env = "NAMEREG_ORACLE", default_value_t = default_endpoint())]
    endpoint: String,

    /// Deadline for each oracle call in milliseconds (0 disables it)
    #[arg(short, long, default_value_t = 5000)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Is the fully qualified name well formed?
    NameValid { name: String },
    /// Is the namespace identifier well formed?
    NamespaceValid { namespace: String },
    /// Is the name unregistered?
    NameAvailable { name: String },
    /// Is the namespace unregistered?
    NamespaceAvailable { namespace: String },
    /// Does the address own the name?
    OwnsName { name: String, address: String },
    /// Did the address reveal the namespace?
    RevealedNamespace { namespace: String, address: String },
    /// Has the namespace been launched?
    NamespaceReady { namespace: String },
    /// Is the namespace revealed but not launched yet?
    NamespaceRevealed { namespace: String },
    /// Has the name expired less than one grace period ago?
    InGracePeriod { name: String },
    /// Can the address receive one more name?
    CanReceiveName { address: String },
}

impl From<Command> for SafetyRequest {
    fn from(command: Command) -> Self {
        match command {
            Command::NameValid { name } => SafetyRequest::IsNameValid(name),
            Command::NamespaceValid { namespace } => SafetyRequest::IsNamespaceValid(namespace),
            Command::NameAvailable { name } => SafetyRequest::IsNameAvailable(name),
            Command::NamespaceAvailable { namespace } => {
                SafetyRequest::IsNamespaceAvailable(namespace)
            }
            Command::OwnsName { name, address } => SafetyRequest::OwnsName { name, address },
            Command::RevealedNamespace { namespace, address } => {
                SafetyRequest::RevealedNamespace { namespace, address }
            }
            Command::NamespaceReady { namespace } => SafetyRequest::NamespaceIsReady(namespace),
            Command::NamespaceRevealed { namespace } => {
                SafetyRequest::NamespaceIsRevealed(namespace)
            }
            Command::InGracePeriod { name } => SafetyRequest::IsInGracePeriod(name),
            Command::CanReceiveName { address } => SafetyRequest::AddressCanReceiveName(address),
        }
    }
}

/// Answers the requested question and writes the decision to `out`.
async fn run(args: NameregArgs, out: &mut impl Write) -> Result<(), Box<dyn std::error::Error>> {
    let oracle = OracleGrpc::new(args.endpoint);
    let request = SafetyRequest::from(args.command);
    let SafetyResponse::Decision(decision) =
        init_safety_with_timeout(oracle, args.timeout_ms).oneshot(request).await?;
    writeln!(out, "{decision}")?;
    Ok(())
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the decision only
    #[cfg(feature = "namereg_tracing")]
    namereg_core::namereg_tracing::init_with_writer(std::io::stderr);

    let args = NameregArgs::parse();
    run(args, &mut std::io::stdout().lock()).await
}
