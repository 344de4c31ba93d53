//! Core services of the safety engine.
//!
//! - **Predicates**: availability, ownership, lifecycle and grace-period
//!   decisions derived from oracle records

pub mod predicates;
