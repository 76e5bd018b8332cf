// Cloak - Deterministic data anonymization for PostgreSQL pipelines
// Copyright (c) 2025 Cloak Contributors
// Licensed under the MIT License

//! # Cloak - Deterministic anonymization with tamper-evident audit
//!
//! Cloak is the anonymization core of a PostgreSQL migration and data-management
//! toolchain. It transforms production rows into anonymized rows using pluggable,
//! seed-deterministic strategies, and records every operation in a signed,
//! append-only audit log that makes post-hoc tampering detectable.
//!
//! ## Overview
//!
//! This library provides:
//! - **Strategies** - pure, seeded transformations (hash, email, phone,
//!   credit card, name, date, address, IP address, redaction, and more)
//! - **Profiles** - declarative, validated `{table, column} -> strategy`
//!   mappings loaded from TOML documents with a closed strategy vocabulary
//! - **Factory** - per-column strategy resolution with caching and bulk
//!   row anonymization
//! - **Audit** - HMAC-signed audit entries with verification that detects
//!   any single-field modification after the fact
//!
//! ## Architecture
//!
//! Cloak follows a layered architecture:
//!
//! - [`anonymization`] - strategies, registry, composer, factory, engine
//! - [`profile`] - profile model, safe loading, validation
//! - [`audit`] - audit entries, signing, verification
//! - [`domain`] - core domain types and errors
//! - [`config`] - secret handling
//! - [`logging`] - structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cloak::anonymization::{AnonymizationConfig, AnonymizationEngine};
//! use cloak::profile::load_profile;
//! use cloak::anonymization::registry;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = registry::snapshot();
//!     let profile = load_profile("profiles/staging.toml", &registry)?;
//!
//!     let config = AnonymizationConfig::default();
//!     let engine = AnonymizationEngine::new(config, profile)?;
//!
//!     let rows = vec![/* rows from the syncer */];
//!     let anonymized = engine.anonymize_table("users", &rows)?;
//!
//!     println!("Anonymized {} rows", anonymized.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Determinism
//!
//! Every built-in strategy is a pure function of `(value, resolved seed)`.
//! The same value under the same seed anonymizes identically across columns,
//! tables, runs, and process restarts, which preserves foreign-key joins
//! between anonymized datasets. Seeds resolve with strict precedence:
//! rule seed, then profile `global_seed`, then the run-supplied seed from the
//! environment. A seeded strategy with no seed available fails loudly rather
//! than falling back to randomness.
//!
//! ## Error Handling
//!
//! Cloak uses the [`domain::CloakError`] type for all errors:
//!
//! ```rust,no_run
//! use cloak::domain::CloakError;
//!
//! fn example() -> Result<(), CloakError> {
//!     let registry = cloak::anonymization::registry::snapshot();
//!     let profile = cloak::profile::load_profile("profile.toml", &registry)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Cloak uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(table = "users", rows = 1500, "Anonymization complete");
//! warn!(entry = "op-42", "Audit signature mismatch");
//! ```

pub mod anonymization;
pub mod audit;
pub mod config;
pub mod domain;
pub mod logging;
pub mod profile;
pub mod scenarios;
