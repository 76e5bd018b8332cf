//! Credit card masking strategy

use super::is_passthrough;
use super::phone::mask_digits;
use crate::anonymization::seed::SeedContext;
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{CloakError, Result, Row};
use serde_json::Value;

/// Format-preserving card number masking with a valid Luhn checksum.
///
/// Works like phone masking (digits replaced, separators kept, configured
/// prefix/suffix preserved), then adjusts the last non-preserved digit so
/// the full number satisfies the Luhn checksum. Payment-shaped test data
/// that fails Luhn validation gets rejected by most downstream systems,
/// so masked numbers must still check out.
///
/// Parameters:
/// - `preserve_prefix`: leading digits kept as-is (default 0)
/// - `preserve_suffix`: trailing digits kept as-is (default 4)
pub struct CreditCardMaskingStrategy {
    seed: i64,
    preserve_prefix: usize,
    preserve_suffix: usize,
}

impl CreditCardMaskingStrategy {
    pub fn from_config(config: &StrategyConfig, seeds: &SeedContext) -> Result<Self> {
        Ok(Self {
            seed: seeds.require()?,
            preserve_prefix: config.param_usize("preserve_prefix")?.unwrap_or(0),
            preserve_suffix: config.param_usize("preserve_suffix")?.unwrap_or(4),
        })
    }
}

/// Luhn checksum validity over the digits of `text` (separators ignored).
pub fn luhn_valid(text: &str) -> bool {
    let digits: Vec<u32> = text
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();
    if digits.is_empty() {
        return false;
    }
    luhn_sum(&digits) % 10 == 0
}

fn luhn_sum(digits: &[u32]) -> u32 {
    digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum()
}

/// Adjusts one non-preserved digit so the whole number passes Luhn.
///
/// Returns the input unchanged when every digit is preserved.
fn fix_luhn(masked: &str, digit_count: usize, preserve_prefix: usize, preserve_suffix: usize) -> String {
    let adjustable = (0..digit_count)
        .rev()
        .find(|&i| i >= preserve_prefix && i < digit_count.saturating_sub(preserve_suffix));
    let Some(target) = adjustable else {
        return masked.to_string();
    };

    let mut digits: Vec<u32> = masked.chars().filter_map(|c| c.to_digit(10)).collect();
    for candidate in 0..10 {
        digits[target] = candidate;
        if luhn_sum(&digits) % 10 == 0 {
            break;
        }
    }

    // Write the adjusted digit back into the formatted string.
    let mut digit_index = 0usize;
    masked
        .chars()
        .map(|c| {
            if !c.is_ascii_digit() {
                return c;
            }
            let position = digit_index;
            digit_index += 1;
            if position == target {
                char::from_digit(digits[target], 10).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

impl Strategy for CreditCardMaskingStrategy {
    fn name(&self) -> &str {
        "credit_card"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        let text = value.as_str().ok_or_else(|| {
            CloakError::strategy_execution("credit_card", "expected a text value")
        })?;
        let digit_count = text.chars().filter(|c| c.is_ascii_digit()).count();
        if digit_count == 0 {
            return Ok(value.clone());
        }

        let masked = mask_digits(self.seed, text, self.preserve_prefix, self.preserve_suffix);
        Ok(Value::String(fix_luhn(
            &masked,
            digit_count,
            self.preserve_prefix,
            self.preserve_suffix,
        )))
    }
}
