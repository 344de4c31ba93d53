//! External-facing API of the safety engine.
//!
//! - **Types**: request/response enums for the oracle and for callers
//! - **Safety**: the service answering [`SafetyRequest`]s on top of an oracle

pub mod safety;
pub mod types;

// Re-export all types for convenience
pub use types::*;
