//! Healthcare PHI anonymization scenario
//!
//! A HIPAA Safe Harbor style profile for research and analytics exports:
//! direct identifiers are masked, clinical content (diagnosis codes,
//! medications, vitals) is preserved so the anonymized dataset stays
//! useful. The fixed demonstration seed keeps outputs reproducible; real
//! deployments supply their own seed through the environment.

use crate::anonymization::strategy::StrategyConfig;
use crate::profile::{AnonymizationProfile, AnonymizationRule, TableRules};
use serde_json::json;
use std::collections::BTreeMap;

fn rule(column: &str, config: StrategyConfig) -> AnonymizationRule {
    AnonymizationRule {
        column: column.to_string(),
        strategy: Some(config),
        compose: None,
    }
}

/// Builds the healthcare profile.
///
/// Mapping:
/// - study identifiers (`patient_id`, `study_id`): preserve
/// - person names: name masking
/// - SSN, MRN, contact details: redaction or keyed hashing
/// - birth and visit dates: jitter with the year pinned
/// - clinical fields (`diagnosis`, `medication`, vitals): preserve
pub fn healthcare_profile() -> AnonymizationProfile {
    let rules = vec![
        rule("patient_id", StrategyConfig::new("preserve")),
        rule("study_id", StrategyConfig::new("preserve")),
        rule("patient_name", StrategyConfig::new("name")),
        rule("provider_name", StrategyConfig::new("name")),
        rule("ssn", StrategyConfig::new("text_redaction")),
        rule(
            "medical_record_number",
            StrategyConfig::new("hash").with_param("length", json!(12)),
        ),
        rule("email", StrategyConfig::new("email")),
        rule(
            "phone",
            StrategyConfig::new("phone").with_param("preserve_prefix", json!(3)),
        ),
        rule(
            "address",
            StrategyConfig::new("address").with_param("preserve", json!(["city", "state"])),
        ),
        rule(
            "date_of_birth",
            StrategyConfig::new("date")
                .with_param("jitter_days", json!(180))
                .with_param("preserve_year", json!(true)),
        ),
        rule(
            "visit_date",
            StrategyConfig::new("date")
                .with_param("jitter_days", json!(30))
                .with_param("preserve_year", json!(true)),
        ),
        rule("ip_address", StrategyConfig::new("ip_address")),
        rule("diagnosis", StrategyConfig::new("preserve")),
        rule("medication", StrategyConfig::new("preserve")),
        rule("vital_temp", StrategyConfig::new("preserve")),
        rule("vital_bp", StrategyConfig::new("preserve")),
    ];

    let mut tables = BTreeMap::new();
    tables.insert("patient_visits".to_string(), TableRules { rules });

    AnonymizationProfile {
        name: "healthcare_hipaa".to_string(),
        version: "1".to_string(),
        // Fixed seed for reproducible demonstrations only.
        global_seed: Some(42),
        tables,
    }
}
