//! Audit entry signing and verification
//!
//! Entries are signed with HMAC-SHA256 over a canonical JSON (RFC 8785)
//! serialization of every field except the signature itself, wrapped in a
//! versioned payload. The canonicalization is fixed: changing it would
//! invalidate existing signed entries, so any future change requires a new
//! payload version alongside a migration of stored entries.
//!
//! Verification recomputes the signature from the entry's stored fields
//! and compares in constant time. Any single-field change flips the
//! result.

use super::entry::AuditEntry;
use crate::config::SecretString;
use crate::domain::{CloakError, Result};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use secrecy::ExposeSecret;
use serde::Serialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

const SIGNING_VERSION: &str = "v1";

/// Borrowed view of the signed fields, in canonical payload form.
#[derive(Serialize)]
struct SigningPayload<'a> {
    version: &'static str,
    operation_id: &'a str,
    table_name: &'a str,
    column_name: &'a str,
    strategy_name: &'a str,
    rows_affected: u64,
    executed_by: &'a str,
    executed_at: &'a DateTime<Utc>,
    profile_hash: &'a str,
}

impl<'a> SigningPayload<'a> {
    fn from_entry(entry: &'a AuditEntry) -> Self {
        Self {
            version: SIGNING_VERSION,
            operation_id: &entry.operation_id,
            table_name: &entry.table_name,
            column_name: &entry.column_name,
            strategy_name: &entry.strategy_name,
            rows_affected: entry.rows_affected,
            executed_by: &entry.executed_by,
            executed_at: &entry.executed_at,
            profile_hash: &entry.profile_hash,
        }
    }
}

/// Signs and verifies audit entries with a keyed hash.
pub struct AuditSigner {
    key: SecretString,
}

impl AuditSigner {
    pub fn new(key: SecretString) -> Self {
        Self { key }
    }

    /// Reads the signing key from an environment variable.
    ///
    /// # Errors
    ///
    /// Fails when the variable is unset or empty; audit signing without a
    /// key would be decorative.
    pub fn from_env(var: &str) -> Result<Self> {
        crate::config::secret_from_env(var)
            .map(Self::new)
            .ok_or_else(|| {
                CloakError::Configuration(format!(
                    "audit signing key environment variable '{var}' is unset or empty"
                ))
            })
    }

    fn compute(&self, entry: &AuditEntry) -> Result<String> {
        let payload = serde_jcs::to_vec(&SigningPayload::from_entry(entry))
            .map_err(|e| CloakError::Serialization(format!("audit payload: {e}")))?;
        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(&payload);
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Computes and attaches the signature. Must be the last step of
    /// entry construction.
    pub fn sign(&self, entry: &mut AuditEntry) -> Result<()> {
        entry.signature = self.compute(entry)?;
        Ok(())
    }

    /// Recomputes the signature from the stored fields and compares in
    /// constant time.
    pub fn verify(&self, entry: &AuditEntry) -> Result<bool> {
        let stored = hex::decode(&entry.signature)
            .map_err(|e| CloakError::AuditIntegrity(format!("invalid signature encoding: {e}")))?;
        let computed = hex::decode(self.compute(entry)?)
            .map_err(|e| CloakError::AuditIntegrity(format!("invalid computed encoding: {e}")))?;
        if stored.len() != computed.len() {
            return Ok(false);
        }
        Ok(stored.ct_eq(computed.as_slice()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::AuditOperation;
    use crate::config::secret_string;

    fn signer() -> AuditSigner {
        AuditSigner::new(secret_string("test-signing-key".to_string()))
    }

    fn signed_entry() -> AuditEntry {
        let mut entry = AuditEntry::from_operation(
            &AuditOperation {
                table: "users".to_string(),
                column: "email".to_string(),
                strategy: "hash".to_string(),
                rows_affected: 100,
                executed_by: "sync-job".to_string(),
            },
            "abc123",
        );
        signer().sign(&mut entry).unwrap();
        entry
    }

    #[test]
    fn test_sign_attaches_signature() {
        let entry = signed_entry();
        assert!(entry.is_signed());
        assert_eq!(entry.signature.len(), 64);
    }

    #[test]
    fn test_verify_accepts_untouched_entry() {
        assert!(signer().verify(&signed_entry()).unwrap());
    }

    #[test]
    fn test_rows_affected_mutation_detected() {
        let mut entry = signed_entry();
        entry.rows_affected = 1;
        assert!(!signer().verify(&entry).unwrap());
    }

    #[test]
    fn test_executed_by_mutation_detected() {
        let mut entry = signed_entry();
        entry.executed_by = "someone-else".to_string();
        assert!(!signer().verify(&entry).unwrap());
    }

    #[test]
    fn test_every_text_field_mutation_detected() {
        let fields: Vec<fn(&mut AuditEntry)> = vec![
            |e| e.operation_id.push('x'),
            |e| e.table_name.push('x'),
            |e| e.column_name.push('x'),
            |e| e.strategy_name.push('x'),
            |e| e.profile_hash.push('x'),
        ];
        for mutate in fields {
            let mut entry = signed_entry();
            mutate(&mut entry);
            assert!(!signer().verify(&entry).unwrap());
        }
    }

    #[test]
    fn test_timestamp_mutation_detected() {
        let mut entry = signed_entry();
        entry.executed_at = entry.executed_at + chrono::Duration::seconds(1);
        assert!(!signer().verify(&entry).unwrap());
    }

    #[test]
    fn test_wrong_key_rejected() {
        let entry = signed_entry();
        let other = AuditSigner::new(secret_string("other-key".to_string()));
        assert!(!other.verify(&entry).unwrap());
    }

    #[test]
    fn test_garbage_signature_is_error() {
        let mut entry = signed_entry();
        entry.signature = "not-hex".to_string();
        assert!(signer().verify(&entry).is_err());
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("CLOAK_TEST_AUDIT_KEY", "key-material");
        assert!(AuditSigner::from_env("CLOAK_TEST_AUDIT_KEY").is_ok());
        std::env::remove_var("CLOAK_TEST_AUDIT_KEY");
        assert!(AuditSigner::from_env("CLOAK_TEST_AUDIT_KEY").is_err());
    }
}
