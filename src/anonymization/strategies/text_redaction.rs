//! Pattern-based partial redaction strategy

use super::is_passthrough;
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{CloakError, Result, Row};
use regex::Regex;
use serde_json::Value;

/// Built-in patterns: emails, phone-shaped digit groups, and long
/// identifier-like digit runs (SSNs, account numbers).
const BUILTIN_PATTERNS: &[&str] = &[
    r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}",
    r"\+?\d{1,3}[-. (]*\d{3}[-. )]*\d{3}[-. ]*\d{2,4}",
    r"\b\d{3}-\d{2}-\d{4}\b",
    r"\b\d{6,}\b",
];

/// Replaces every regex match inside free text with a placeholder,
/// leaving the surrounding text intact.
///
/// Parameters:
/// - `patterns`: additional caller-supplied regex patterns (default none)
/// - `builtin`: include the built-in pattern set (default true)
/// - `replacement`: placeholder text (default `[REDACTED]`)
/// - `preserve_length`: star-fill each match to its original length
///   (default false)
pub struct TextRedactionStrategy {
    patterns: Vec<Regex>,
    replacement: String,
    preserve_length: bool,
}

impl TextRedactionStrategy {
    pub fn from_config(config: &StrategyConfig) -> Result<Self> {
        let mut sources: Vec<String> = Vec::new();
        if config.param_bool("builtin")?.unwrap_or(true) {
            sources.extend(BUILTIN_PATTERNS.iter().map(|p| p.to_string()));
        }
        if let Some(extra) = config.param_str_list("patterns")? {
            sources.extend(extra);
        }
        if sources.is_empty() {
            return Err(CloakError::Configuration(
                "strategy 'text_redaction': no patterns configured".to_string(),
            ));
        }

        let mut patterns = Vec::with_capacity(sources.len());
        for source in &sources {
            let regex = Regex::new(source).map_err(|e| {
                CloakError::Configuration(format!(
                    "strategy 'text_redaction': invalid pattern '{source}': {e}"
                ))
            })?;
            patterns.push(regex);
        }

        Ok(Self {
            patterns,
            replacement: config
                .param_str("replacement")?
                .unwrap_or("[REDACTED]")
                .to_string(),
            preserve_length: config.param_bool("preserve_length")?.unwrap_or(false),
        })
    }

    fn redact(&self, text: &str) -> String {
        let mut current = text.to_string();
        for pattern in &self.patterns {
            current = if self.preserve_length {
                pattern
                    .replace_all(&current, |caps: &regex::Captures<'_>| {
                        "*".repeat(caps[0].chars().count())
                    })
                    .into_owned()
            } else {
                pattern
                    .replace_all(&current, self.replacement.as_str())
                    .into_owned()
            };
        }
        current
    }
}

impl Strategy for TextRedactionStrategy {
    fn name(&self) -> &str {
        "text_redaction"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        match value {
            Value::String(s) => Ok(Value::String(self.redact(s))),
            // Pattern matching only applies to text; other scalars pass.
            other => Ok(other.clone()),
        }
    }
}
