//! Strategy abstraction
//!
//! A strategy is a pure, seeded, typed mapping from an input value (plus
//! optional row context) to an anonymized output value. Implementations are
//! immutable after construction so a single cached instance can be shared
//! across worker threads processing rows concurrently.

use crate::domain::{CloakError, Result, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The unit of transformation.
///
/// # Contract
///
/// - Referentially transparent given `(value, row, resolved seed)`: the same
///   inputs always produce the same output, across calls and process restarts.
/// - Must not mutate its configuration; all fields are set at construction.
/// - Passes `Null` and empty-string input through unchanged unless the
///   concrete strategy explicitly defines null handling.
/// - Preserves the value's JSON type unless its contract says otherwise
///   (e.g. hashing a number into a text digest is an explicit opt-in).
pub trait Strategy: Send + Sync {
    /// The registered name of this strategy type (for logging and audit).
    fn name(&self) -> &str;

    /// Transforms one value. `row` carries the other column values of the
    /// same row, read-only, for conditional logic.
    fn anonymize(&self, value: &Value, row: &Row) -> Result<Value>;
}

/// Immutable configuration for one strategy instance.
///
/// `strategy_type` must be a member of the registry's known set at profile
/// validation time; unknown types are rejected before any data is touched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StrategyConfig {
    /// Strategy type name (member of the registry's closed vocabulary)
    #[serde(rename = "type")]
    pub strategy_type: String,

    /// Rule-level seed override (highest precedence tier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,

    /// Strategy-specific parameters (scalars and scalar lists)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,
}

impl StrategyConfig {
    /// Creates a config with no seed and no parameters.
    pub fn new(strategy_type: impl Into<String>) -> Self {
        Self {
            strategy_type: strategy_type.into(),
            seed: None,
            parameters: BTreeMap::new(),
        }
    }

    /// Sets the rule-level seed.
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Adds one parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    fn param_error(&self, key: &str, expected: &str) -> CloakError {
        CloakError::Configuration(format!(
            "strategy '{}': parameter '{}' must be {}",
            self.strategy_type, key, expected
        ))
    }

    /// String parameter, or `None` when absent.
    pub fn param_str(&self, key: &str) -> Result<Option<&str>> {
        match self.parameters.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(self.param_error(key, "a string")),
        }
    }

    /// Integer parameter, or `None` when absent.
    pub fn param_i64(&self, key: &str) -> Result<Option<i64>> {
        match self.parameters.get(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| self.param_error(key, "an integer")),
            Some(_) => Err(self.param_error(key, "an integer")),
        }
    }

    /// Non-negative integer parameter as usize, or `None` when absent.
    pub fn param_usize(&self, key: &str) -> Result<Option<usize>> {
        match self.param_i64(key)? {
            None => Ok(None),
            Some(n) if n >= 0 => Ok(Some(n as usize)),
            Some(_) => Err(self.param_error(key, "a non-negative integer")),
        }
    }

    /// Boolean parameter, or `None` when absent.
    pub fn param_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.parameters.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.param_error(key, "a boolean")),
        }
    }

    /// String-list parameter, or `None` when absent.
    pub fn param_str_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.parameters.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(s) => out.push(s.clone()),
                        _ => return Err(self.param_error(key, "a list of strings")),
                    }
                }
                Ok(Some(out))
            }
            Some(_) => Err(self.param_error(key, "a list of strings")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_with(key: &str, value: Value) -> StrategyConfig {
        StrategyConfig::new("hash").with_param(key, value)
    }

    #[test]
    fn test_param_str() {
        let config = config_with("alphabet", json!("hex"));
        assert_eq!(config.param_str("alphabet").unwrap(), Some("hex"));
        assert_eq!(config.param_str("missing").unwrap(), None);
        assert!(config_with("alphabet", json!(2)).param_str("alphabet").is_err());
    }

    #[test]
    fn test_param_i64() {
        let config = config_with("length", json!(16));
        assert_eq!(config.param_i64("length").unwrap(), Some(16));
        assert!(config_with("length", json!("x")).param_i64("length").is_err());
    }

    #[test]
    fn test_param_usize_rejects_negative() {
        let config = config_with("length", json!(-1));
        assert!(config.param_usize("length").is_err());
    }

    #[test]
    fn test_param_bool() {
        let config = config_with("preserve_domain", json!(false));
        assert_eq!(config.param_bool("preserve_domain").unwrap(), Some(false));
        assert!(config_with("preserve_domain", json!("no"))
            .param_bool("preserve_domain")
            .is_err());
    }

    #[test]
    fn test_param_str_list() {
        let config = config_with("patterns", json!(["a", "b"]));
        assert_eq!(
            config.param_str_list("patterns").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert!(config_with("patterns", json!([1]))
            .param_str_list("patterns")
            .is_err());
    }

    #[test]
    fn test_param_error_names_strategy_and_key() {
        let err = config_with("length", json!("x"))
            .param_i64("length")
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("hash"));
        assert!(message.contains("length"));
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let toml_str = r#"
type = "hash"
seed = 42

[parameters]
length = 12
alphabet = "hex"
"#;
        let config: StrategyConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.strategy_type, "hash");
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.param_i64("length").unwrap(), Some(12));
    }

    #[test]
    fn test_config_rejects_unknown_fields() {
        let toml_str = r#"
type = "hash"
exec = "rm -rf /"
"#;
        assert!(toml::from_str::<StrategyConfig>(toml_str).is_err());
    }
}
