//! Email masking strategy

use super::{is_passthrough, keyed_bytes};
use crate::anonymization::seed::SeedContext;
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{CloakError, Result, Row};
use serde_json::Value;

/// Masks the local part of an email address deterministically.
///
/// `john@example.com` becomes `user_a1b2c3d4@example.com`: the local part
/// is replaced with a keyed digest of the whole address, the domain is
/// preserved by default.
///
/// Parameters:
/// - `preserve_domain`: keep the original domain (default true)
/// - `replacement_domain`: domain to use when not preserving
///   (default `example.com`)
/// - `local_length`: digest length for the local part (default 8)
pub struct EmailMaskingStrategy {
    seed: i64,
    preserve_domain: bool,
    replacement_domain: String,
    local_length: usize,
}

impl EmailMaskingStrategy {
    pub fn from_config(config: &StrategyConfig, seeds: &SeedContext) -> Result<Self> {
        let local_length = config.param_usize("local_length")?.unwrap_or(8);
        if local_length == 0 || local_length > 64 {
            return Err(CloakError::Configuration(
                "strategy 'email': parameter 'local_length' must be between 1 and 64".to_string(),
            ));
        }
        Ok(Self {
            seed: seeds.require()?,
            preserve_domain: config.param_bool("preserve_domain")?.unwrap_or(true),
            replacement_domain: config
                .param_str("replacement_domain")?
                .unwrap_or("example.com")
                .to_string(),
            local_length,
        })
    }

    fn masked_local(&self, original: &str) -> String {
        let digest = hex::encode(keyed_bytes(self.seed, original));
        format!("user_{}", &digest[..self.local_length])
    }
}

impl Strategy for EmailMaskingStrategy {
    fn name(&self) -> &str {
        "email"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        let text = value.as_str().ok_or_else(|| {
            CloakError::strategy_execution("email", "expected a text value")
        })?;

        // The digest covers the whole address so two locals at different
        // domains never collide.
        let local = self.masked_local(text);
        let masked = match text.rsplit_once('@') {
            Some((_, domain)) if self.preserve_domain => format!("{local}@{domain}"),
            _ => format!("{local}@{}", self.replacement_domain),
        };
        Ok(Value::String(masked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn strategy(seed: i64) -> EmailMaskingStrategy {
        EmailMaskingStrategy::from_config(
            &StrategyConfig::new("email"),
            &SeedContext {
                rule_seed: Some(seed),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_preserves_domain_by_default() {
        let out = strategy(42)
            .anonymize(&json!("john@example.com"), &Row::new())
            .unwrap();
        let text = out.as_str().unwrap();
        assert!(text.ends_with("@example.com"));
        assert!(text.starts_with("user_"));
        assert!(!text.contains("john"));
    }

    #[test]
    fn test_deterministic() {
        let row = Row::new();
        let a = strategy(42).anonymize(&json!("john@example.com"), &row).unwrap();
        let b = strategy(42).anonymize(&json!("john@example.com"), &row).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_replacement_domain() {
        let config = StrategyConfig::new("email")
            .with_param("preserve_domain", json!(false))
            .with_param("replacement_domain", json!("masked.invalid"));
        let s = EmailMaskingStrategy::from_config(
            &config,
            &SeedContext {
                rule_seed: Some(42),
                ..Default::default()
            },
        )
        .unwrap();
        let out = s.anonymize(&json!("john@example.com"), &Row::new()).unwrap();
        assert!(out.as_str().unwrap().ends_with("@masked.invalid"));
    }

    #[test]
    fn test_same_local_different_domain_diverges() {
        let row = Row::new();
        let s = strategy(42);
        let a = s.anonymize(&json!("john@a.com"), &row).unwrap();
        let b = s.anonymize(&json!("john@b.com"), &row).unwrap();
        let a_local = a.as_str().unwrap().split('@').next().unwrap().to_string();
        let b_local = b.as_str().unwrap().split('@').next().unwrap().to_string();
        assert_ne!(a_local, b_local);
    }

    #[test]
    fn test_value_without_at_sign() {
        let out = strategy(42).anonymize(&json!("not-an-email"), &Row::new()).unwrap();
        let text = out.as_str().unwrap();
        assert!(text.starts_with("user_"));
        assert!(text.ends_with("@example.com"));
    }

    #[test]
    fn test_null_passthrough() {
        assert_eq!(
            strategy(42).anonymize(&Value::Null, &Row::new()).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_non_string_rejected() {
        assert!(strategy(42).anonymize(&json!(5), &Row::new()).is_err());
    }
}
