//! Infrastructure shared by the safety services.
//!
//! - **Validation**: syntactic rules for names and namespace identifiers

pub mod validation;
