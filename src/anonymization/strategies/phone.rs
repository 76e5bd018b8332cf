//! Phone number masking strategy

use super::{is_passthrough, keyed_bytes};
use crate::anonymization::seed::SeedContext;
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{CloakError, Result, Row};
use serde_json::Value;

/// Format-preserving phone masking.
///
/// Digits are replaced with deterministically derived digits; separators,
/// spaces, and a leading `+` stay exactly where they were. A configured
/// count of leading and trailing digits can be preserved.
///
/// Parameters:
/// - `preserve_prefix`: leading digits kept as-is (default 0)
/// - `preserve_suffix`: trailing digits kept as-is (default 0)
pub struct PhoneMaskingStrategy {
    seed: i64,
    preserve_prefix: usize,
    preserve_suffix: usize,
}

impl PhoneMaskingStrategy {
    pub fn from_config(config: &StrategyConfig, seeds: &SeedContext) -> Result<Self> {
        Ok(Self {
            seed: seeds.require()?,
            preserve_prefix: config.param_usize("preserve_prefix")?.unwrap_or(0),
            preserve_suffix: config.param_usize("preserve_suffix")?.unwrap_or(0),
        })
    }
}

/// Replaces non-preserved digits in `text` with digits drawn from the
/// keyed digest of the whole value. Shared with the credit card strategy.
pub(crate) fn mask_digits(
    seed: i64,
    text: &str,
    preserve_prefix: usize,
    preserve_suffix: usize,
) -> String {
    let digit_count = text.chars().filter(|c| c.is_ascii_digit()).count();
    if digit_count == 0 {
        return text.to_string();
    }

    let digest = keyed_bytes(seed, text);
    let mut digit_index = 0usize;
    text.chars()
        .map(|c| {
            if !c.is_ascii_digit() {
                return c;
            }
            let position = digit_index;
            digit_index += 1;
            let preserved = position < preserve_prefix
                || position >= digit_count.saturating_sub(preserve_suffix);
            if preserved {
                c
            } else {
                let byte = digest[position % digest.len()];
                char::from(b'0' + (byte % 10))
            }
        })
        .collect()
}

impl Strategy for PhoneMaskingStrategy {
    fn name(&self) -> &str {
        "phone"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        let text = value.as_str().ok_or_else(|| {
            CloakError::strategy_execution("phone", "expected a text value")
        })?;
        Ok(Value::String(mask_digits(
            self.seed,
            text,
            self.preserve_prefix,
            self.preserve_suffix,
        )))
    }
}
