//! Profile model, safe loading, and validation
//!
//! A profile maps `{table, column}` to strategy configuration for one
//! anonymization run. Documents are TOML, parsed with a primitive-only
//! deserializer and validated against the registry's closed strategy
//! vocabulary before any data is touched.

pub mod loader;
pub mod model;

// Re-export commonly used types
pub use loader::{load_profile, parse_profile};
pub use model::{AnonymizationProfile, AnonymizationRule, ComposeSpec, TableRules};
