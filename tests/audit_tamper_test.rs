//! Tamper-evidence tests for the audit trail

use cloak::audit::{AuditEntry, AuditLogger, AuditOperation, AuditSigner};
use cloak::config::secret_string;
use cloak::domain::CloakError;
use tempfile::tempdir;

fn signer() -> AuditSigner {
    AuditSigner::new(secret_string("tamper-test-key".to_string()))
}

fn operation() -> AuditOperation {
    AuditOperation {
        table: "users".to_string(),
        column: "email".to_string(),
        strategy: "hash".to_string(),
        rows_affected: 100,
        executed_by: "nightly-sync".to_string(),
    }
}

fn signed_entry() -> AuditEntry {
    let mut entry = AuditEntry::from_operation(&operation(), "profile-hash-abc");
    signer().sign(&mut entry).unwrap();
    entry
}

#[test]
fn test_untouched_entry_verifies() {
    assert!(signer().verify(&signed_entry()).unwrap());
}

#[test]
fn test_mutating_any_single_field_flips_verification() {
    let mutations: Vec<(&str, fn(&mut AuditEntry))> = vec![
        ("operation_id", |e| e.operation_id = "op-forged".to_string()),
        ("table_name", |e| e.table_name = "payments".to_string()),
        ("column_name", |e| e.column_name = "card".to_string()),
        ("strategy_name", |e| e.strategy_name = "preserve".to_string()),
        ("rows_affected", |e| e.rows_affected = 1),
        ("executed_by", |e| e.executed_by = "intruder".to_string()),
        ("executed_at", |e| {
            e.executed_at = e.executed_at - chrono::Duration::days(30)
        }),
        ("profile_hash", |e| e.profile_hash = "other-profile".to_string()),
    ];

    for (field, mutate) in mutations {
        let mut entry = signed_entry();
        mutate(&mut entry);
        assert!(
            !signer().verify(&entry).unwrap(),
            "mutation of '{field}' went undetected"
        );
    }
}

#[test]
fn test_store_level_tampering_is_a_finding() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let logger = AuditLogger::new(path.clone(), signer(), "profile-hash-abc".to_string()).unwrap();

    for _ in 0..3 {
        let entry = logger.create_entry(&operation()).unwrap();
        logger.append(&entry).unwrap();
    }

    // An attacker edits the middle line to shrink the reported row count.
    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    let forged = lines[1].replace("\"rows_affected\":100", "\"rows_affected\":1");
    let rewritten = format!("{}\n{}\n{}\n", lines[0], forged, lines[2]);
    std::fs::write(&path, rewritten).unwrap();

    let report = logger.verify_log().unwrap();
    assert_eq!(report.total, 3);
    assert_eq!(report.valid, 2);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].line, 2);
    assert_eq!(report.findings[0].reason, "signature mismatch");
}

#[test]
fn test_findings_are_reported_not_repaired() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let logger = AuditLogger::new(path.clone(), signer(), "profile-hash-abc".to_string()).unwrap();

    let entry = logger.create_entry(&operation()).unwrap();
    logger.append(&entry).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let tampered = contents.replace("nightly-sync", "someone-else");
    std::fs::write(&path, &tampered).unwrap();

    logger.verify_log().unwrap();

    // The store is byte-for-byte what the attacker left; verification
    // never writes.
    assert_eq!(std::fs::read_to_string(&path).unwrap(), tampered);
}

#[test]
fn test_entry_verification_error_carries_operation_id() {
    let dir = tempdir().unwrap();
    let logger = AuditLogger::new(
        dir.path().join("audit.jsonl"),
        signer(),
        "profile-hash-abc".to_string(),
    )
    .unwrap();

    let mut entry = logger.create_entry(&operation()).unwrap();
    entry.rows_affected = 7;
    let err = logger.verify(&entry).unwrap_err();
    match err {
        CloakError::AuditIntegrity(message) => assert!(message.contains(&entry.operation_id)),
        other => panic!("unexpected variant: {other:?}"),
    }
}

#[test]
fn test_signature_survives_serialization_round_trip() {
    let entry = signed_entry();
    let line = serde_json::to_string(&entry).unwrap();
    let restored: AuditEntry = serde_json::from_str(&line).unwrap();
    assert!(signer().verify(&restored).unwrap());
}
