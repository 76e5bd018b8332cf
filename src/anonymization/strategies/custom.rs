//! Caller-supplied custom strategy

use super::is_passthrough;
use crate::anonymization::strategy::Strategy;
use crate::domain::{CloakError, Result, Row};
use serde_json::Value;
use std::sync::Arc;

/// The signature for caller-supplied transformation functions.
pub type CustomFn = dyn Fn(&Value, &Row) -> anyhow::Result<Value> + Send + Sync;

/// Wraps a caller-supplied pure function as a [`Strategy`].
///
/// Failures from the wrapped function surface as strategy execution
/// errors; they never propagate as bare foreign errors. Null and empty
/// input pass through without invoking the function, matching the default
/// null handling of every other strategy.
pub struct CustomStrategy {
    name: String,
    func: Arc<CustomFn>,
}

impl CustomStrategy {
    pub fn new(name: impl Into<String>, func: Arc<CustomFn>) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl Strategy for CustomStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn anonymize(&self, value: &Value, row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        (self.func)(value, row)
            .map_err(|e| CloakError::strategy_execution(&self.name, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uppercase() -> CustomStrategy {
        CustomStrategy::new(
            "uppercase",
            Arc::new(|value: &Value, _row: &Row| {
                let text = value
                    .as_str()
                    .ok_or_else(|| anyhow::anyhow!("expected text"))?;
                Ok(Value::String(text.to_uppercase()))
            }),
        )
    }

    #[test]
    fn test_wrapped_function_applies() {
        let out = uppercase().anonymize(&json!("abc"), &Row::new()).unwrap();
        assert_eq!(out, json!("ABC"));
    }

    #[test]
    fn test_failure_becomes_strategy_error() {
        let err = uppercase().anonymize(&json!(5), &Row::new()).unwrap_err();
        match err {
            CloakError::StrategyExecution { strategy, message, .. } => {
                assert_eq!(strategy, "uppercase");
                assert!(message.contains("expected text"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_row_context_available() {
        let conditional = CustomStrategy::new(
            "mask_by_tier",
            Arc::new(|value: &Value, row: &Row| {
                if row.get("tier") == Some(&json!("internal")) {
                    Ok(value.clone())
                } else {
                    Ok(json!("[MASKED]"))
                }
            }),
        );
        let mut row = Row::new();
        row.insert("tier".to_string(), json!("internal"));
        assert_eq!(
            conditional.anonymize(&json!("kept"), &row).unwrap(),
            json!("kept")
        );

        let other = Row::new();
        assert_eq!(
            conditional.anonymize(&json!("kept"), &other).unwrap(),
            json!("[MASKED]")
        );
    }

    #[test]
    fn test_null_passthrough_without_invocation() {
        let panicking = CustomStrategy::new(
            "never_called",
            Arc::new(|_: &Value, _: &Row| anyhow::bail!("should not run")),
        );
        assert_eq!(
            panicking.anonymize(&Value::Null, &Row::new()).unwrap(),
            Value::Null
        );
    }
}
