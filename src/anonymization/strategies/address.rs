//! Address masking strategy

use super::{index_from, is_passthrough, keyed_bytes};
use crate::anonymization::seed::SeedContext;
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{CloakError, Result, Row};
use serde_json::Value;

const STREET_NAMES: &[&str] = &[
    "Maple", "Oak", "Birch", "Cedar", "Elm", "Willow", "Aspen", "Juniper", "Magnolia", "Chestnut",
    "Sycamore", "Poplar", "Hawthorn", "Linden", "Alder", "Spruce",
];

const STREET_SUFFIXES: &[&str] = &["St", "Ave", "Rd", "Ln", "Blvd", "Way"];

/// Masks postal addresses while optionally preserving coarse location
/// fields.
///
/// Two input shapes are supported:
/// - a plain string, replaced by a deterministic synthetic street line
/// - a structured object, where the configured `preserve` field subset
///   (typically city/state/zip/country) is kept and every other text
///   field is anonymized
///
/// Parameters:
/// - `preserve`: list of object field names to keep (default empty)
pub struct AddressMaskingStrategy {
    seed: i64,
    preserve: Vec<String>,
}

impl AddressMaskingStrategy {
    pub fn from_config(config: &StrategyConfig, seeds: &SeedContext) -> Result<Self> {
        Ok(Self {
            seed: seeds.require()?,
            preserve: config.param_str_list("preserve")?.unwrap_or_default(),
        })
    }

    fn street_line(&self, original: &str) -> String {
        let digest = keyed_bytes(self.seed, original);
        let index = index_from(&digest);
        let number = 100 + (index % 9900);
        let name = STREET_NAMES[(index_from(&digest[8..16]) as usize) % STREET_NAMES.len()];
        let suffix =
            STREET_SUFFIXES[(index_from(&digest[16..24]) as usize) % STREET_SUFFIXES.len()];
        format!("{number} {name} {suffix}")
    }

    fn token(&self, original: &str) -> String {
        let digest = hex::encode(keyed_bytes(self.seed, original));
        format!("anon-{}", &digest[..8])
    }

    fn is_street_field(key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        key.contains("street") || key.contains("line") || key.contains("address")
    }
}

impl Strategy for AddressMaskingStrategy {
    fn name(&self) -> &str {
        "address"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        match value {
            Value::String(s) => Ok(Value::String(self.street_line(s))),
            Value::Object(fields) => {
                let mut masked = serde_json::Map::with_capacity(fields.len());
                for (key, field) in fields {
                    if self.preserve.iter().any(|p| p == key) {
                        masked.insert(key.clone(), field.clone());
                        continue;
                    }
                    let replacement = match field {
                        Value::String(s) if s.is_empty() => field.clone(),
                        Value::String(s) if Self::is_street_field(key) => {
                            Value::String(self.street_line(s))
                        }
                        Value::String(s) => Value::String(self.token(s)),
                        other => other.clone(),
                    };
                    masked.insert(key.clone(), replacement);
                }
                Ok(Value::Object(masked))
            }
            _ => Err(CloakError::strategy_execution(
                "address",
                "expected a text value or a structured address object",
            )),
        }
    }
}
