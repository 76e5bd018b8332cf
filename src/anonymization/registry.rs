//! Strategy registry
//!
//! The process-wide catalog mapping a strategy-type name to its
//! constructor. The registry is the sole source of truth for which
//! strategy types exist: profile validation checks every referenced type
//! against it before any data is touched.
//!
//! The global catalog is the one piece of global mutable state in this
//! crate. Writes happen during process initialization (or behind the lock
//! for late registration); reads take a snapshot and never contend
//! afterwards.

use crate::anonymization::seed::SeedContext;
use crate::anonymization::strategies::{self, custom::CustomStrategy};
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{CloakError, Result, Row};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, RwLock};

/// Builds a strategy instance from its config and the visible seed tiers.
pub type StrategyConstructor =
    Arc<dyn Fn(&StrategyConfig, &SeedContext) -> Result<Arc<dyn Strategy>> + Send + Sync>;

/// Catalog of strategy constructors keyed by type name.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    constructors: BTreeMap<String, StrategyConstructor>,
}

impl StrategyRegistry {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog pre-populated with the built-in strategy vocabulary.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        // Built-in registration cannot collide in a fresh catalog.
        strategies::register_builtins(&mut registry)
            .expect("built-in strategy names are unique");
        registry
    }

    /// Registers a constructor, rejecting duplicate names.
    pub fn register(&mut self, name: &str, constructor: StrategyConstructor) -> Result<()> {
        if self.constructors.contains_key(name) {
            return Err(CloakError::Configuration(format!(
                "strategy type '{name}' is already registered (use register_override to replace it)"
            )));
        }
        self.constructors.insert(name.to_string(), constructor);
        Ok(())
    }

    /// Registers a constructor, replacing any existing registration.
    pub fn register_override(&mut self, name: &str, constructor: StrategyConstructor) {
        self.constructors.insert(name.to_string(), constructor);
    }

    /// Registers a caller-supplied pure function under a caller-chosen
    /// name. This is the extension point for embedding code; the function
    /// becomes available to profiles like any built-in type.
    pub fn register_function<F>(&mut self, name: &str, func: F) -> Result<()>
    where
        F: Fn(&Value, &Row) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        let func: Arc<crate::anonymization::strategies::custom::CustomFn> = Arc::new(func);
        let name_owned = name.to_string();
        self.register(
            name,
            Arc::new(move |_cfg, _seeds| {
                Ok(Arc::new(CustomStrategy::new(name_owned.clone(), Arc::clone(&func)))
                    as Arc<dyn Strategy>)
            }),
        )
    }

    /// Builds a strategy instance by type name.
    pub fn build(
        &self,
        name: &str,
        config: &StrategyConfig,
        seeds: &SeedContext,
    ) -> Result<Arc<dyn Strategy>> {
        let constructor = self.constructors.get(name).ok_or_else(|| {
            CloakError::UnknownStrategy {
                name: name.to_string(),
                available: self.list().join(", "),
            }
        })?;
        constructor(config, seeds)
    }

    /// True when a type name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered type names, sorted.
    pub fn list(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }
}

static GLOBAL_REGISTRY: OnceLock<RwLock<StrategyRegistry>> = OnceLock::new();

/// The process-wide catalog, initialized with the built-ins on first use.
pub fn global() -> &'static RwLock<StrategyRegistry> {
    GLOBAL_REGISTRY.get_or_init(|| RwLock::new(StrategyRegistry::with_builtins()))
}

/// Clones the current global catalog.
///
/// A run works against a stable snapshot: registrations made after the
/// snapshot do not affect profiles already being processed.
pub fn snapshot() -> StrategyRegistry {
    global()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Registers a caller-supplied function in the global catalog.
///
/// Must happen before any profile referencing the name is loaded.
pub fn register_global_function<F>(name: &str, func: F) -> Result<()>
where
    F: Fn(&Value, &Row) -> anyhow::Result<Value> + Send + Sync + 'static,
{
    global()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .register_function(name, func)
}
