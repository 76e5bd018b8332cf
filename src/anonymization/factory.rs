//! Strategy factory
//!
//! Turns a validated profile into live strategy instances and drives
//! row-shaped data through them. Instances are constructed lazily and
//! cached per `(table, column)`: every row of a run goes through the
//! identical instance, which is required for seed-scoped determinism.
//! The cache takes a write lock only on first construction; steady-state
//! lookups are shared reads, so concurrent row workers never contend.

use crate::anonymization::composer::compose;
use crate::anonymization::registry::StrategyRegistry;
use crate::anonymization::seed::SeedContext;
use crate::anonymization::strategy::Strategy;
use crate::domain::{CloakError, Result, Row};
use crate::profile::{AnonymizationProfile, AnonymizationRule};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// What to do with row columns the profile doesn't mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmappedColumnPolicy {
    /// Pass the value through unchanged (the default)
    #[default]
    Passthrough,
    /// Fail the row; every column must carry an explicit rule
    Deny,
}

/// Per-column activity of one bulk run, fed to the audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCount {
    pub column: String,
    pub strategy: String,
    pub rows_affected: u64,
}

/// Result of anonymizing a batch of rows for one table.
pub struct AnonymizedBatch {
    pub rows: Vec<Row>,
    pub column_counts: Vec<ColumnCount>,
}

/// Resolves, caches, and applies strategies for one profile.
pub struct StrategyFactory {
    profile: Arc<AnonymizationProfile>,
    registry: StrategyRegistry,
    run_seed: Option<i64>,
    policy: UnmappedColumnPolicy,
    cache: RwLock<HashMap<(String, String), Arc<dyn Strategy>>>,
}

impl StrategyFactory {
    pub fn new(
        profile: Arc<AnonymizationProfile>,
        registry: StrategyRegistry,
        run_seed: Option<i64>,
        policy: UnmappedColumnPolicy,
    ) -> Self {
        Self {
            profile,
            registry,
            run_seed,
            policy,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The profile this factory serves.
    pub fn profile(&self) -> &AnonymizationProfile {
        &self.profile
    }

    fn rule(&self, table: &str, column: &str) -> Option<&AnonymizationRule> {
        self.profile
            .tables
            .get(table)
            .and_then(|rules| rules.rules.iter().find(|r| r.column == column))
    }

    fn build_strategy(&self, table: &str, rule: &AnonymizationRule) -> Result<Arc<dyn Strategy>> {
        let build_one = |config: &crate::anonymization::strategy::StrategyConfig| {
            let seeds = SeedContext {
                rule_seed: config.seed,
                profile_seed: self.profile.global_seed,
                run_seed: self.run_seed,
            };
            self.registry.build(&config.strategy_type, config, &seeds)
        };

        match (&rule.strategy, &rule.compose) {
            (Some(single), _) => build_one(single),
            (None, Some(spec)) => {
                let mut links = Vec::with_capacity(spec.steps.len());
                for step in &spec.steps {
                    links.push(build_one(step)?);
                }
                Ok(Arc::new(compose(links, spec.composition_config())) as Arc<dyn Strategy>)
            }
            (None, None) => Err(CloakError::Configuration(format!(
                "table '{table}', column '{}': rule carries no strategy",
                rule.column
            ))),
        }
    }

    /// Resolves (and caches) the strategy for a table column.
    ///
    /// # Errors
    ///
    /// Fails when the profile carries no rule for the column, the strategy
    /// type is unknown, its parameters are malformed, or a seeded strategy
    /// has no seed through any precedence tier.
    pub fn get_strategy(&self, table: &str, column: &str) -> Result<Arc<dyn Strategy>> {
        let key = (table.to_string(), column.to_string());
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(&key)
        {
            return Ok(Arc::clone(cached));
        }

        let rule = self.rule(table, column).ok_or_else(|| {
            CloakError::Configuration(format!(
                "profile '{}' has no rule for {table}.{column}",
                self.profile.name
            ))
        })?;
        let strategy = self.build_strategy(table, rule)?;

        let mut cache = self
            .cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let entry = cache.entry(key).or_insert_with(|| Arc::clone(&strategy));
        Ok(Arc::clone(entry))
    }

    /// Anonymizes one row, passing the full row as context to each
    /// strategy. Returns a new row with the same keys.
    pub fn anonymize_row(&self, table: &str, row: &Row) -> Result<Row> {
        let mut out = Row::new();
        for (column, value) in row {
            if self.rule(table, column).is_some() {
                let strategy = self.get_strategy(table, column)?;
                let masked = strategy
                    .anonymize(value, row)
                    .map_err(|e| e.at(table, column))?;
                out.insert(column.clone(), masked);
            } else {
                match self.policy {
                    UnmappedColumnPolicy::Passthrough => {
                        out.insert(column.clone(), value.clone());
                    }
                    UnmappedColumnPolicy::Deny => {
                        return Err(CloakError::Configuration(format!(
                            "column {table}.{column} has no anonymization rule and the unmapped-column policy is deny"
                        )));
                    }
                }
            }
        }
        Ok(out)
    }

    /// Anonymizes a batch of rows, reporting per-column activity counts.
    pub fn anonymize_rows(&self, table: &str, rows: &[Row]) -> Result<AnonymizedBatch> {
        let rules = self
            .profile
            .tables
            .get(table)
            .map(|t| t.rules.as_slice())
            .unwrap_or_default();

        let mut counts: Vec<ColumnCount> = rules
            .iter()
            .map(|rule| ColumnCount {
                column: rule.column.clone(),
                strategy: rule.strategy_label(),
                rows_affected: 0,
            })
            .collect();

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let masked = self.anonymize_row(table, row)?;
            for count in counts.iter_mut() {
                if row.contains_key(&count.column) {
                    count.rows_affected += 1;
                }
            }
            out.push(masked);
        }

        tracing::debug!(
            table,
            rows = out.len(),
            columns = counts.len(),
            "Anonymized batch"
        );

        Ok(AnonymizedBatch {
            rows: out,
            column_counts: counts,
        })
    }
}
