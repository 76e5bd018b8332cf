//! Strategy composition
//!
//! Chains an ordered list of strategies into a single pipeline: each link's
//! output becomes the next link's input. The composed object satisfies the
//! same [`Strategy`] interface and may itself be nested inside another
//! composition.

use crate::anonymization::strategy::Strategy;
use crate::domain::{Result, Row};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Chain control flags.
///
/// - `stop_on_none`: when the running value becomes null, stop and return
///   null immediately
/// - `stop_on_error`: when true (the default), the first failing link
///   aborts the whole chain; when false, a failing link is skipped and its
///   input passes unchanged to the next link
/// - `skip_empty`: when the running value is an empty string, skip the
///   remaining links and return it unchanged
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CompositionConfig {
    #[serde(default)]
    pub stop_on_none: bool,
    #[serde(default = "default_true")]
    pub stop_on_error: bool,
    #[serde(default)]
    pub skip_empty: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            stop_on_none: false,
            stop_on_error: true,
            skip_empty: false,
        }
    }
}

/// Chains strategies into a single pipeline strategy.
pub fn compose(links: Vec<Arc<dyn Strategy>>, config: CompositionConfig) -> CompositeStrategy {
    CompositeStrategy { links, config }
}

/// An ordered chain of strategies, itself a [`Strategy`].
pub struct CompositeStrategy {
    links: Vec<Arc<dyn Strategy>>,
    config: CompositionConfig,
}

impl CompositeStrategy {
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl Strategy for CompositeStrategy {
    fn name(&self) -> &str {
        "compose"
    }

    fn anonymize(&self, value: &Value, row: &Row) -> Result<Value> {
        let mut current = value.clone();
        for link in &self.links {
            if self.config.stop_on_none && current.is_null() {
                return Ok(current);
            }
            if self.config.skip_empty && current.as_str().is_some_and(|s| s.is_empty()) {
                return Ok(current);
            }
            match link.anonymize(&current, row) {
                Ok(next) => current = next,
                Err(e) if !self.config.stop_on_error => {
                    tracing::warn!(
                        link = link.name(),
                        error = %e,
                        "Chain link failed, passing value through"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(current)
    }
}
