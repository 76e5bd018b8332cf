//! Deterministic keyed-hash strategy
//!
//! Replaces a value with a truncated, encoded HMAC-SHA256 digest keyed by
//! the resolved seed. Equal inputs under equal seeds produce equal digests,
//! which is the backbone of foreign-key-consistent anonymization.

use super::{is_passthrough, keyed_bytes};
use crate::anonymization::seed::SeedContext;
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{CloakError, Result, Row};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;

const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Output encoding for the digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlphabet {
    Hex,
    Base64,
    Alphanumeric,
}

impl HashAlphabet {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "hex" => Ok(Self::Hex),
            "base64" => Ok(Self::Base64),
            "alphanumeric" => Ok(Self::Alphanumeric),
            other => Err(CloakError::Configuration(format!(
                "strategy 'hash': unknown alphabet '{other}' (expected hex, base64, or alphanumeric)"
            ))),
        }
    }
}

/// Keyed cryptographic hash with configurable output length and alphabet.
///
/// Parameters:
/// - `length`: output length in characters (default 16)
/// - `alphabet`: `hex` | `base64` | `alphanumeric` (default `hex`)
/// - `digest_numeric`: allow numeric input, emitting a text digest
///   (default false; the type change must be an explicit choice)
pub struct HashStrategy {
    seed: i64,
    length: usize,
    alphabet: HashAlphabet,
    digest_numeric: bool,
}

impl HashStrategy {
    pub fn from_config(config: &StrategyConfig, seeds: &SeedContext) -> Result<Self> {
        let length = config.param_usize("length")?.unwrap_or(16);
        if length == 0 {
            return Err(CloakError::Configuration(
                "strategy 'hash': parameter 'length' must be at least 1".to_string(),
            ));
        }
        let alphabet = match config.param_str("alphabet")? {
            Some(s) => HashAlphabet::parse(s)?,
            None => HashAlphabet::Hex,
        };
        Ok(Self {
            seed: seeds.require()?,
            length,
            alphabet,
            digest_numeric: config.param_bool("digest_numeric")?.unwrap_or(false),
        })
    }

    /// Digest of one text value under this strategy's seed and encoding.
    pub fn digest(&self, text: &str) -> String {
        let bytes = keyed_bytes(self.seed, text);
        let encoded = match self.alphabet {
            HashAlphabet::Hex => hex::encode(bytes),
            HashAlphabet::Base64 => URL_SAFE_NO_PAD.encode(bytes),
            HashAlphabet::Alphanumeric => bytes
                .iter()
                .map(|b| ALPHANUMERIC[(*b as usize) % ALPHANUMERIC.len()] as char)
                .collect(),
        };
        let mut out = encoded;
        out.truncate(self.length);
        out
    }
}

impl Strategy for HashStrategy {
    fn name(&self) -> &str {
        "hash"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        match value {
            Value::String(s) => Ok(Value::String(self.digest(s))),
            Value::Number(n) if self.digest_numeric => Ok(Value::String(self.digest(&n.to_string()))),
            Value::Number(_) => Err(CloakError::strategy_execution(
                "hash",
                "numeric input requires digest_numeric = true (the output becomes text)",
            )),
            other => Err(CloakError::strategy_execution(
                "hash",
                format!("unsupported input type: {}", json_type(other)),
            )),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strategy(seed: i64) -> HashStrategy {
        HashStrategy::from_config(
            &StrategyConfig::new("hash"),
            &SeedContext {
                rule_seed: Some(seed),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_deterministic() {
        let s = strategy(42);
        let row = Row::new();
        let a = s.anonymize(&json!("a@x.com"), &row).unwrap();
        let b = s.anonymize(&json!("a@x.com"), &row).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_same_seed_same_output_across_instances() {
        let row = Row::new();
        let a = strategy(42).anonymize(&json!("a@x.com"), &row).unwrap();
        let b = strategy(42).anonymize(&json!("a@x.com"), &row).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_output() {
        let row = Row::new();
        let a = strategy(42).anonymize(&json!("a@x.com"), &row).unwrap();
        let b = strategy(43).anonymize(&json!("a@x.com"), &row).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_output_is_not_input() {
        let row = Row::new();
        let out = strategy(42).anonymize(&json!("a@x.com"), &row).unwrap();
        assert_ne!(out, json!("a@x.com"));
    }

    #[test]
    fn test_null_and_empty_pass_through() {
        let s = strategy(42);
        let row = Row::new();
        assert_eq!(s.anonymize(&Value::Null, &row).unwrap(), Value::Null);
        assert_eq!(s.anonymize(&json!(""), &row).unwrap(), json!(""));
    }

    #[test]
    fn test_length_and_hex_alphabet() {
        let config = StrategyConfig::new("hash")
            .with_param("length", json!(12))
            .with_param("alphabet", json!("hex"));
        let s = HashStrategy::from_config(
            &config,
            &SeedContext {
                rule_seed: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        let out = s.digest("value");
        assert_eq!(out.len(), 12);
        assert!(out.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_alphanumeric_alphabet() {
        let config = StrategyConfig::new("hash").with_param("alphabet", json!("alphanumeric"));
        let s = HashStrategy::from_config(
            &config,
            &SeedContext {
                rule_seed: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(s.digest("value").chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_numeric_rejected_without_opt_in() {
        let s = strategy(42);
        assert!(s.anonymize(&json!(123), &Row::new()).is_err());
    }

    #[test]
    fn test_numeric_digest_with_opt_in() {
        let config = StrategyConfig::new("hash").with_param("digest_numeric", json!(true));
        let s = HashStrategy::from_config(
            &config,
            &SeedContext {
                rule_seed: Some(1),
                ..Default::default()
            },
        )
        .unwrap();
        let out = s.anonymize(&json!(123), &Row::new()).unwrap();
        assert!(out.is_string());
    }

    #[test]
    fn test_missing_seed_fails_construction() {
        let err = HashStrategy::from_config(&StrategyConfig::new("hash"), &SeedContext::default())
            .unwrap_err();
        assert!(matches!(err, CloakError::SeedUnavailable(_)));
    }

    #[test]
    fn test_unknown_alphabet_rejected() {
        let config = StrategyConfig::new("hash").with_param("alphabet", json!("emoji"));
        assert!(HashStrategy::from_config(
            &config,
            &SeedContext {
                rule_seed: Some(1),
                ..Default::default()
            }
        )
        .is_err());
    }
}
