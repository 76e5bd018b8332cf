//! Preset anonymization profiles for common deployments
//!
//! These serve as living documentation: each scenario builds a complete,
//! validated profile with the library API instead of a TOML document.

pub mod healthcare;

pub use healthcare::healthcare_profile;
