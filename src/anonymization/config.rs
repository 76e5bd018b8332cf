//! Anonymization run configuration

use crate::anonymization::factory::UnmappedColumnPolicy;
use crate::domain::{CloakError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default environment variable carrying the run-supplied seed.
pub const DEFAULT_SEED_ENV_VAR: &str = "CLOAK_SEED";

/// Default environment variable carrying the audit signing key.
pub const DEFAULT_AUDIT_KEY_ENV_VAR: &str = "CLOAK_AUDIT_KEY";

/// Run-level settings for the anonymization engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnonymizationConfig {
    /// Identity recorded as `executed_by` in audit entries
    #[serde(default = "default_executed_by")]
    pub executed_by: String,

    /// Environment variable holding the run-supplied seed tier
    #[serde(default = "default_seed_env_var")]
    pub seed_env_var: String,

    /// Fail rows containing columns without an explicit rule
    #[serde(default)]
    pub strict_columns: bool,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_executed_by() -> String {
    "unknown".to_string()
}

fn default_seed_env_var() -> String {
    DEFAULT_SEED_ENV_VAR.to_string()
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            executed_by: default_executed_by(),
            seed_env_var: default_seed_env_var(),
            strict_columns: false,
            audit: AuditConfig::default(),
        }
    }
}

impl AnonymizationConfig {
    /// Loads configuration from a TOML file and applies `CLOAK_*`
    /// environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CloakError::Configuration(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut config: Self = toml::from_str(&contents)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// The unmapped-column policy implied by `strict_columns`.
    pub fn column_policy(&self) -> UnmappedColumnPolicy {
        if self.strict_columns {
            UnmappedColumnPolicy::Deny
        } else {
            UnmappedColumnPolicy::Passthrough
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.executed_by.is_empty() {
            return Err(CloakError::Configuration(
                "executed_by must not be empty".to_string(),
            ));
        }
        if self.seed_env_var.is_empty() {
            return Err(CloakError::Configuration(
                "seed_env_var must not be empty".to_string(),
            ));
        }
        self.audit.validate()
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("CLOAK_EXECUTED_BY") {
            self.executed_by = val;
        }
        if let Ok(val) = std::env::var("CLOAK_STRICT_COLUMNS") {
            self.strict_columns = val.parse().map_err(|_| {
                CloakError::Configuration(format!("Invalid CLOAK_STRICT_COLUMNS value: {val}"))
            })?;
        }
        self.audit.apply_env_overrides()?;
        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Environment variable holding the signing key
    #[serde(default = "default_audit_key_env_var")]
    pub key_env_var: String,
}

fn default_audit_enabled() -> bool {
    true
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.jsonl")
}

fn default_audit_key_env_var() -> String {
    DEFAULT_AUDIT_KEY_ENV_VAR.to_string()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            log_path: default_audit_log_path(),
            key_env_var: default_audit_key_env_var(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.key_env_var.is_empty() {
            return Err(CloakError::Configuration(
                "audit.key_env_var must not be empty when audit logging is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("CLOAK_AUDIT_ENABLED") {
            self.enabled = val.parse().map_err(|_| {
                CloakError::Configuration(format!("Invalid CLOAK_AUDIT_ENABLED value: {val}"))
            })?;
        }
        if let Ok(val) = std::env::var("CLOAK_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }
        Ok(())
    }
}
