//! Name masking strategy

use super::{index_from, is_passthrough, keyed_bytes};
use crate::anonymization::seed::SeedContext;
use crate::anonymization::strategy::{Strategy, StrategyConfig};
use crate::domain::{CloakError, Result, Row};
use serde_json::Value;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Benjamin", "Carmen", "Daniel", "Elena", "Felix", "Grace", "Hugo", "Iris", "Jonas",
    "Katherine", "Liam", "Maria", "Noah", "Olivia", "Pablo", "Quinn", "Rosa", "Samuel", "Tessa",
    "Ursula", "Victor", "Wendy", "Xavier", "Yara", "Zachary", "Amara", "Bruno", "Celine", "Dmitri",
    "Esther", "Farid", "Greta", "Henrik", "Ines", "Jamal", "Kira", "Lucas", "Mona", "Nina",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Becker", "Castillo", "Dubois", "Eriksen", "Fischer", "Garcia", "Hansen", "Ivanov",
    "Jensen", "Kowalski", "Larsen", "Moreau", "Nakamura", "Olsen", "Petrov", "Quintero", "Rossi",
    "Schmidt", "Tanaka", "Ueda", "Vasquez", "Weber", "Xu", "Yamamoto", "Zimmermann", "Adeyemi",
    "Brandt", "Costa", "Dalton", "Engel", "Ferreira", "Gallo", "Holm", "Imai", "Jansen", "Keller",
    "Lindgren", "Meyer", "Novak",
];

/// Output shape for masked names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameFormat {
    Full,
    First,
    Last,
    Initials,
}

impl NameFormat {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(Self::Full),
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "initials" => Ok(Self::Initials),
            other => Err(CloakError::Configuration(format!(
                "strategy 'name': unknown format '{other}' (expected full, first, last, or initials)"
            ))),
        }
    }
}

/// Replaces a personal name with one drawn from a fixed corpus, indexed
/// by a keyed hash of the original value.
///
/// Parameters:
/// - `format`: `full` | `first` | `last` | `initials` (default `full`)
pub struct NameMaskingStrategy {
    seed: i64,
    format: NameFormat,
}

impl NameMaskingStrategy {
    pub fn from_config(config: &StrategyConfig, seeds: &SeedContext) -> Result<Self> {
        let format = match config.param_str("format")? {
            Some(s) => NameFormat::parse(s)?,
            None => NameFormat::Full,
        };
        Ok(Self {
            seed: seeds.require()?,
            format,
        })
    }

    fn pick(&self, original: &str) -> (&'static str, &'static str) {
        let digest = keyed_bytes(self.seed, original);
        let first = FIRST_NAMES[(index_from(&digest) as usize) % FIRST_NAMES.len()];
        let last_index = index_from(&digest[8..16]) as usize;
        let last = LAST_NAMES[last_index % LAST_NAMES.len()];
        (first, last)
    }
}

impl Strategy for NameMaskingStrategy {
    fn name(&self) -> &str {
        "name"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        if is_passthrough(value) {
            return Ok(value.clone());
        }
        let text = value.as_str().ok_or_else(|| {
            CloakError::strategy_execution("name", "expected a text value")
        })?;
        let (first, last) = self.pick(text);
        let masked = match self.format {
            NameFormat::Full => format!("{first} {last}"),
            NameFormat::First => first.to_string(),
            NameFormat::Last => last.to_string(),
            NameFormat::Initials => {
                let fi = first.chars().next().unwrap_or('X');
                let li = last.chars().next().unwrap_or('X');
                format!("{fi}.{li}.")
            }
        };
        Ok(Value::String(masked))
    }
}
