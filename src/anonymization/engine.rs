//! Main anonymization engine
//!
//! This module provides the core [`AnonymizationEngine`] that ties the
//! pieces together for one run: a validated profile, the strategy factory
//! with its per-column cache, the resolved run seed, and the audit logger.
//! The external syncer drives rows through this seam and never sees a
//! strategy or a signing key directly.
//!
//! # Examples
//!
//! ```no_run
//! use cloak::anonymization::{AnonymizationConfig, AnonymizationEngine, registry};
//! use cloak::profile::load_profile;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = registry::snapshot();
//! let profile = load_profile("profiles/staging.toml", &registry)?;
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default(), profile)?;
//!
//! let rows = vec![/* rows from the syncer */];
//! let anonymized = engine.anonymize_table("users", &rows)?;
//! # Ok(())
//! # }
//! ```

use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::factory::StrategyFactory;
use crate::anonymization::registry::{self, StrategyRegistry};
use crate::anonymization::seed::SeedSource;
use crate::audit::{AuditLogger, AuditOperation, AuditSigner, AuditVerificationReport};
use crate::domain::{Result, Row};
use crate::profile::AnonymizationProfile;
use std::sync::Arc;

/// Orchestrates anonymization and audit logging for one run.
///
/// # Thread Safety
///
/// The engine is immutable after construction and can be shared across
/// worker threads with `Arc`; the factory's strategy cache handles
/// concurrent readers internally.
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    factory: StrategyFactory,
    audit_logger: Option<AuditLogger>,
    profile_hash: String,
}

impl AnonymizationEngine {
    /// Creates an engine against the global strategy catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails, the profile
    /// fails validation, or audit logging is enabled and the signing key
    /// environment variable is unset.
    pub fn new(config: AnonymizationConfig, profile: AnonymizationProfile) -> Result<Self> {
        Self::with_registry(config, profile, registry::snapshot())
    }

    /// Creates an engine against an explicit registry snapshot.
    pub fn with_registry(
        config: AnonymizationConfig,
        profile: AnonymizationProfile,
        registry: StrategyRegistry,
    ) -> Result<Self> {
        config.validate()?;
        profile.validate_against(&registry)?;

        let profile_hash = profile.content_hash()?;
        let profile = Arc::new(profile);

        let run_seed = SeedSource::from_env(&config.seed_env_var).resolve();
        let factory = StrategyFactory::new(
            Arc::clone(&profile),
            registry,
            run_seed,
            config.column_policy(),
        );

        let audit_logger = if config.audit.enabled {
            let signer = AuditSigner::from_env(&config.audit.key_env_var)?;
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                signer,
                profile_hash.clone(),
            )?)
        } else {
            None
        };

        tracing::info!(
            profile = %profile.name,
            version = %profile.version,
            tables = profile.tables.len(),
            audit = config.audit.enabled,
            "Anonymization engine ready"
        );

        Ok(Self {
            config,
            factory,
            audit_logger,
            profile_hash,
        })
    }

    /// Content hash of the active profile, as recorded in audit entries.
    pub fn profile_hash(&self) -> &str {
        &self.profile_hash
    }

    /// Anonymizes a single row without touching the audit trail.
    ///
    /// Bulk flows should prefer [`anonymize_table`](Self::anonymize_table),
    /// which records one audit entry per column rule.
    pub fn anonymize_row(&self, table: &str, row: &Row) -> Result<Row> {
        self.factory.anonymize_row(table, row)
    }

    /// Anonymizes a batch of rows for one table and appends one signed
    /// audit entry per column rule with the real row count.
    pub fn anonymize_table(&self, table: &str, rows: &[Row]) -> Result<Vec<Row>> {
        let batch = self.factory.anonymize_rows(table, rows)?;

        if let Some(ref logger) = self.audit_logger {
            for count in &batch.column_counts {
                let entry = logger.create_entry(&AuditOperation {
                    table: table.to_string(),
                    column: count.column.clone(),
                    strategy: count.strategy.clone(),
                    rows_affected: count.rows_affected,
                    executed_by: self.config.executed_by.clone(),
                })?;
                logger.append(&entry)?;
            }
        }

        tracing::info!(table, rows = batch.rows.len(), "Anonymization complete");
        Ok(batch.rows)
    }

    /// Scans the audit store and reports tampered entries.
    ///
    /// Returns an empty report when audit logging is disabled.
    pub fn verify_audit_log(&self) -> Result<AuditVerificationReport> {
        match self.audit_logger {
            Some(ref logger) => logger.verify_log(),
            None => Ok(AuditVerificationReport::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::config::AuditConfig;
    use crate::anonymization::strategy::StrategyConfig;
    use crate::profile::{AnonymizationRule, TableRules};
    use serde_json::json;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn profile() -> AnonymizationProfile {
        let mut tables = BTreeMap::new();
        tables.insert(
            "users".to_string(),
            TableRules {
                rules: vec![AnonymizationRule {
                    column: "email".to_string(),
                    strategy: Some(StrategyConfig::new("hash")),
                    compose: None,
                }],
            },
        );
        AnonymizationProfile {
            name: "test".to_string(),
            version: "1".to_string(),
            global_seed: Some(42),
            tables,
        }
    }

    fn config_without_audit() -> AnonymizationConfig {
        let mut config = AnonymizationConfig::default();
        config.audit = AuditConfig {
            enabled: false,
            ..Default::default()
        };
        config
    }

    fn row(email: &str) -> Row {
        let mut row = Row::new();
        row.insert("email".to_string(), json!(email));
        row
    }

    #[test]
    fn test_engine_creation() {
        let engine = AnonymizationEngine::new(config_without_audit(), profile());
        assert!(engine.is_ok());
    }

    #[test]
    fn test_engine_rejects_invalid_profile() {
        let mut bad = profile();
        bad.tables.get_mut("users").unwrap().rules[0]
            .strategy
            .as_mut()
            .unwrap()
            .strategy_type = "not_a_real_type".to_string();
        assert!(AnonymizationEngine::new(config_without_audit(), bad).is_err());
    }

    #[test]
    fn test_audit_enabled_requires_key() {
        std::env::remove_var("CLOAK_TEST_ENGINE_MISSING_KEY");
        let mut config = AnonymizationConfig::default();
        config.audit.key_env_var = "CLOAK_TEST_ENGINE_MISSING_KEY".to_string();
        assert!(AnonymizationEngine::new(config, profile()).is_err());
    }

    #[test]
    fn test_anonymize_table_without_audit() {
        let engine = AnonymizationEngine::new(config_without_audit(), profile()).unwrap();
        let out = engine
            .anonymize_table("users", &[row("a@x.com"), row("b@x.com")])
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_ne!(out[0]["email"], json!("a@x.com"));
        assert!(engine.verify_audit_log().unwrap().is_clean());
    }

    #[test]
    fn test_anonymize_table_appends_audit_entries() {
        let dir = tempdir().unwrap();
        std::env::set_var("CLOAK_TEST_ENGINE_KEY", "engine-key");
        let mut config = AnonymizationConfig::default();
        config.executed_by = "test-runner".to_string();
        config.audit.key_env_var = "CLOAK_TEST_ENGINE_KEY".to_string();
        config.audit.log_path = dir.path().join("audit.jsonl");

        let engine = AnonymizationEngine::new(config, profile()).unwrap();
        engine
            .anonymize_table("users", &[row("a@x.com"), row("b@x.com")])
            .unwrap();

        let report = engine.verify_audit_log().unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.valid, 1);

        let contents = std::fs::read_to_string(dir.path().join("audit.jsonl")).unwrap();
        assert!(contents.contains("\"rows_affected\":2"));
        assert!(contents.contains("test-runner"));
        assert!(contents.contains(engine.profile_hash()));
    }
}
