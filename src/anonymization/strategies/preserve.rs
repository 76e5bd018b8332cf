//! Identity strategy
//!
//! Exists so every column in a table can carry an explicit strategy,
//! making "not anonymized" an auditable decision rather than an omission.

use crate::anonymization::strategy::Strategy;
use crate::domain::{Result, Row};
use serde_json::Value;

/// Returns the input unchanged.
pub struct PreserveStrategy;

impl PreserveStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PreserveStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for PreserveStrategy {
    fn name(&self) -> &str {
        "preserve"
    }

    fn anonymize(&self, value: &Value, _row: &Row) -> Result<Value> {
        Ok(value.clone())
    }
}
