//! Whole-value redaction strategy

use super::is_passthrough;
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{Result, Row};
use serde_json::Value;

/// Replaces the entire value with a fixed placeholder.
///
/// Parameters:
/// - `replacement`: placeholder text (default `[REDACTED]`)
/// - `preserve_length`: emit a star-fill of the original character count
///   instead of the fixed placeholder (default false; text input only)
pub struct RedactStrategy {
    replacement: String,
    preserve_length: bool,
}

impl RedactStrategy {
    pub fn from_config(config: &StrategyConfig) -> Result<Self> {
        Ok(Self {
            replacement: config
                .param_str("replacement")?
                .unwrap_or("[REDACTED]")
                .to_string(),
            preserve_length: config.param_bool("preserve_length")?.unwrap_or(false),
        })
    }
}

impl Strategy for RedactStrategy {
    fn name(&self) -> &str {
        "redact"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        let masked = match value {
            Value::String(s) if self.preserve_length => "*".repeat(s.chars().count()),
            _ => self.replacement.clone(),
        };
        Ok(Value::String(masked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_replacement() {
        let s = RedactStrategy::from_config(&StrategyConfig::new("redact")).unwrap();
        assert_eq!(
            s.anonymize(&json!("secret"), &Row::new()).unwrap(),
            json!("[REDACTED]")
        );
    }

    #[test]
    fn test_custom_replacement() {
        let config = StrategyConfig::new("redact").with_param("replacement", json!("<gone>"));
        let s = RedactStrategy::from_config(&config).unwrap();
        assert_eq!(
            s.anonymize(&json!("secret"), &Row::new()).unwrap(),
            json!("<gone>")
        );
    }

    #[test]
    fn test_preserve_length() {
        let config = StrategyConfig::new("redact").with_param("preserve_length", json!(true));
        let s = RedactStrategy::from_config(&config).unwrap();
        assert_eq!(
            s.anonymize(&json!("secret"), &Row::new()).unwrap(),
            json!("******")
        );
    }

    #[test]
    fn test_number_becomes_placeholder() {
        let s = RedactStrategy::from_config(&StrategyConfig::new("redact")).unwrap();
        assert_eq!(
            s.anonymize(&json!(1234), &Row::new()).unwrap(),
            json!("[REDACTED]")
        );
    }

    #[test]
    fn test_null_and_empty_passthrough() {
        let s = RedactStrategy::from_config(&StrategyConfig::new("redact")).unwrap();
        assert_eq!(s.anonymize(&Value::Null, &Row::new()).unwrap(), Value::Null);
        assert_eq!(s.anonymize(&json!(""), &Row::new()).unwrap(), json!(""));
    }
}
