//! Anonymization profile data model
//!
//! A profile is the declarative, validated mapping of columns to
//! strategies for one anonymization run. It is constructed once from an
//! external TOML document, validated against the registry's closed
//! strategy vocabulary, and immutable thereafter.

use crate::anonymization::composer::CompositionConfig;
use crate::anonymization::registry::StrategyRegistry;
use crate::anonymization::strategy::StrategyConfig;
use crate::domain::{CloakError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

/// A validated profile: `{table, column}` mapped to strategy configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnonymizationProfile {
    pub name: String,
    pub version: String,

    /// Profile-wide seed (middle precedence tier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_seed: Option<i64>,

    #[serde(default)]
    pub tables: BTreeMap<String, TableRules>,
}

/// Per-table rule list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct TableRules {
    #[serde(default)]
    pub rules: Vec<AnonymizationRule>,
}

/// One column's strategy assignment: a single strategy or a composed chain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AnonymizationRule {
    pub column: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compose: Option<ComposeSpec>,
}

/// Declarative composition: ordered steps plus chain control flags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ComposeSpec {
    pub steps: Vec<StrategyConfig>,

    #[serde(default)]
    pub stop_on_none: bool,

    #[serde(default = "default_true")]
    pub stop_on_error: bool,

    #[serde(default)]
    pub skip_empty: bool,
}

fn default_true() -> bool {
    true
}

impl ComposeSpec {
    pub fn composition_config(&self) -> CompositionConfig {
        CompositionConfig {
            stop_on_none: self.stop_on_none,
            stop_on_error: self.stop_on_error,
            skip_empty: self.skip_empty,
        }
    }
}

impl AnonymizationRule {
    /// All strategy configs this rule references, in application order.
    pub fn strategy_configs(&self) -> Vec<&StrategyConfig> {
        match (&self.strategy, &self.compose) {
            (Some(single), _) => vec![single],
            (None, Some(spec)) => spec.steps.iter().collect(),
            (None, None) => Vec::new(),
        }
    }

    /// Human-readable label for audit records.
    pub fn strategy_label(&self) -> String {
        match (&self.strategy, &self.compose) {
            (Some(single), _) => single.strategy_type.clone(),
            (None, Some(spec)) => {
                let types: Vec<&str> =
                    spec.steps.iter().map(|s| s.strategy_type.as_str()).collect();
                format!("compose({})", types.join("+"))
            }
            (None, None) => String::new(),
        }
    }
}

impl AnonymizationProfile {
    /// Validates the profile against a registry's strategy vocabulary.
    ///
    /// Checks, per table: no duplicate column rules; each rule carries
    /// exactly one of `strategy`/`compose`; composed chains are non-empty;
    /// every referenced strategy type exists in the registry; parameter
    /// values are scalars or scalar lists. Errors name the offending
    /// table, column, and field. Partial profiles are never accepted.
    pub fn validate_against(&self, registry: &StrategyRegistry) -> Result<()> {
        if self.name.is_empty() {
            return Err(CloakError::Configuration(
                "profile name must not be empty".to_string(),
            ));
        }
        for (table, rules) in &self.tables {
            let mut seen = BTreeSet::new();
            for rule in &rules.rules {
                if !seen.insert(rule.column.as_str()) {
                    return Err(CloakError::Configuration(format!(
                        "table '{table}': duplicate rule for column '{}'",
                        rule.column
                    )));
                }
                match (&rule.strategy, &rule.compose) {
                    (Some(_), Some(_)) => {
                        return Err(CloakError::Configuration(format!(
                            "table '{table}', column '{}': rule must carry either 'strategy' or 'compose', not both",
                            rule.column
                        )));
                    }
                    (None, None) => {
                        return Err(CloakError::Configuration(format!(
                            "table '{table}', column '{}': rule carries neither 'strategy' nor 'compose'",
                            rule.column
                        )));
                    }
                    (None, Some(spec)) if spec.steps.is_empty() => {
                        return Err(CloakError::Configuration(format!(
                            "table '{table}', column '{}': 'compose' must list at least one step",
                            rule.column
                        )));
                    }
                    _ => {}
                }
                for config in rule.strategy_configs() {
                    if !registry.contains(&config.strategy_type) {
                        return Err(CloakError::Configuration(format!(
                            "table '{table}', column '{}': unknown strategy type '{}' (available: {})",
                            rule.column,
                            config.strategy_type,
                            registry.list().join(", ")
                        )));
                    }
                    validate_parameters(table, &rule.column, config)?;
                }
            }
        }
        Ok(())
    }

    /// SHA-256 content hash over the canonical JSON serialization.
    ///
    /// The hash is recorded in every audit entry so an auditor can tie an
    /// operation to the exact profile document that drove it. Map ordering
    /// plus canonical JSON make the digest stable across processes.
    pub fn content_hash(&self) -> Result<String> {
        let canonical = serde_jcs::to_vec(self)
            .map_err(|e| CloakError::Serialization(format!("profile canonicalization: {e}")))?;
        Ok(hex::encode(Sha256::digest(&canonical)))
    }
}

fn validate_parameters(table: &str, column: &str, config: &StrategyConfig) -> Result<()> {
    for (key, value) in &config.parameters {
        let valid = match value {
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => true,
            Value::Array(items) => items.iter().all(|item| {
                matches!(item, Value::Bool(_) | Value::Number(_) | Value::String(_))
            }),
            Value::Object(_) => false,
        };
        if !valid {
            return Err(CloakError::Configuration(format!(
                "table '{table}', column '{column}': parameter '{key}' of strategy '{}' must be a scalar or a list of scalars",
                config.strategy_type
            )));
        }
    }
    Ok(())
}
