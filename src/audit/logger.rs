//! Append-only audit logger
//!
//! Writes signed entries to a JSONL store and verifies them later. The
//! interface has no update or delete path at all: entries are only ever
//! appended and, separately, verified. A verification mismatch is reported
//! as a finding, never repaired, since rewriting a tampered record would
//! itself be an integrity violation.

use super::entry::{AuditEntry, AuditOperation};
use super::signer::AuditSigner;
use crate::domain::{CloakError, Result};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

/// One tampered or unreadable entry found during log verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TamperFinding {
    /// 1-based line number in the store
    pub line: usize,
    pub operation_id: Option<String>,
    pub reason: String,
}

/// Outcome of scanning the whole store.
#[derive(Debug, Default)]
pub struct AuditVerificationReport {
    pub total: usize,
    pub valid: usize,
    pub findings: Vec<TamperFinding>,
}

impl AuditVerificationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Creates, signs, appends, and verifies audit entries for one run.
pub struct AuditLogger {
    log_path: PathBuf,
    signer: AuditSigner,
    profile_hash: String,
}

impl AuditLogger {
    /// Creates a logger writing to `log_path`, creating parent
    /// directories as needed.
    pub fn new(log_path: PathBuf, signer: AuditSigner, profile_hash: String) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    CloakError::Io(format!(
                        "Failed to create audit log directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }
        Ok(Self {
            log_path,
            signer,
            profile_hash,
        })
    }

    /// Builds and signs an entry for one completed operation.
    pub fn create_entry(&self, op: &AuditOperation) -> Result<AuditEntry> {
        let mut entry = AuditEntry::from_operation(op, &self.profile_hash);
        self.signer.sign(&mut entry)?;
        Ok(entry)
    }

    /// Appends a signed entry to the store.
    ///
    /// Unsigned entries are refused: an unverifiable record is worse than
    /// a missing one, because it looks like evidence.
    pub fn append(&self, entry: &AuditEntry) -> Result<()> {
        if !entry.is_signed() {
            return Err(CloakError::AuditIntegrity(
                "refusing to append an unsigned audit entry".to_string(),
            ));
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                CloakError::Io(format!(
                    "Failed to open audit log {}: {}",
                    self.log_path.display(),
                    e
                ))
            })?;

        let line = serde_json::to_string(entry)?;
        writeln!(file, "{line}")
            .map_err(|e| CloakError::Io(format!("Failed to write audit entry: {e}")))?;

        tracing::debug!(
            operation_id = %entry.operation_id,
            table = %entry.table_name,
            column = %entry.column_name,
            rows = entry.rows_affected,
            "Audit entry appended"
        );
        Ok(())
    }

    /// Verifies one entry against its stored signature.
    ///
    /// # Errors
    ///
    /// Returns `AuditIntegrity` when the signature does not match the
    /// stored fields.
    pub fn verify(&self, entry: &AuditEntry) -> Result<()> {
        if self.signer.verify(entry)? {
            Ok(())
        } else {
            Err(CloakError::AuditIntegrity(format!(
                "signature mismatch for operation {}",
                entry.operation_id
            )))
        }
    }

    /// Scans the whole store and reports every tampered or unreadable
    /// entry as a finding.
    pub fn verify_log(&self) -> Result<AuditVerificationReport> {
        let mut report = AuditVerificationReport::default();
        if !self.log_path.exists() {
            return Ok(report);
        }

        let file = std::fs::File::open(&self.log_path).map_err(|e| {
            CloakError::Io(format!(
                "Failed to open audit log {}: {}",
                self.log_path.display(),
                e
            ))
        })?;

        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line_number = index + 1;
            report.total += 1;
            let line = line
                .map_err(|e| CloakError::Io(format!("Failed to read audit log line: {e}")))?;

            let entry: AuditEntry = match serde_json::from_str(&line) {
                Ok(entry) => entry,
                Err(e) => {
                    report.findings.push(TamperFinding {
                        line: line_number,
                        operation_id: None,
                        reason: format!("unparseable entry: {e}"),
                    });
                    continue;
                }
            };

            match self.signer.verify(&entry) {
                Ok(true) => report.valid += 1,
                Ok(false) => report.findings.push(TamperFinding {
                    line: line_number,
                    operation_id: Some(entry.operation_id.clone()),
                    reason: "signature mismatch".to_string(),
                }),
                Err(e) => report.findings.push(TamperFinding {
                    line: line_number,
                    operation_id: Some(entry.operation_id.clone()),
                    reason: e.to_string(),
                }),
            }
        }

        if !report.is_clean() {
            tracing::warn!(
                total = report.total,
                findings = report.findings.len(),
                log = %self.log_path.display(),
                "Audit log verification found tampered entries"
            );
        }
        Ok(report)
    }
}
