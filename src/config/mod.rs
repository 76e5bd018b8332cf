//! Configuration support for Cloak
//!
//! Run-level anonymization settings live in
//! [`crate::anonymization::AnonymizationConfig`]; this module holds the
//! shared secret-handling primitives used for the audit signing key and
//! the environment-supplied seed.

pub mod secret;

// Re-export commonly used types
pub use secret::{secret_from_env, secret_string, secret_string_opt, SecretString, SecretValue};
