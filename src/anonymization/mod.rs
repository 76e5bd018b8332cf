//! Anonymization core
//!
//! This module provides seed-deterministic, foreign-key-consistent data
//! transformation for production rows. The pipeline:
//!
//! - **Seed resolution**: rule seed, then profile seed, then run seed
//! - **Strategies**: pure, seeded transformations from a closed registry
//! - **Composition**: ordered chains with explicit error/null/empty
//!   semantics
//! - **Factory**: per-column resolution with caching, bulk row
//!   anonymization
//! - **Engine**: orchestration plus signed audit entries per operation
//!
//! # Usage
//!
//! ```rust,ignore
//! use cloak::anonymization::{AnonymizationConfig, AnonymizationEngine, registry};
//! use cloak::profile::load_profile;
//!
//! let registry = registry::snapshot();
//! let profile = load_profile("staging.toml", &registry)?;
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default(), profile)?;
//! let anonymized = engine.anonymize_table("users", &rows)?;
//! ```

pub mod composer;
pub mod config;
pub mod engine;
pub mod factory;
pub mod registry;
pub mod seed;
pub mod strategies;
pub mod strategy;

// Re-export main types
pub use composer::{compose, CompositionConfig};
pub use config::{AnonymizationConfig, AuditConfig};
pub use engine::AnonymizationEngine;
pub use factory::{AnonymizedBatch, ColumnCount, StrategyFactory, UnmappedColumnPolicy};
pub use registry::StrategyRegistry;
pub use seed::{resolve_seed, SeedContext, SeedSource};
pub use strategy::{Strategy, StrategyConfig};
