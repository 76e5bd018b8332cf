//! Tamper-evident audit logging
//!
//! Every anonymization operation produces a signed [`AuditEntry`]
//! appended to an append-only store. Signatures are keyed hashes over a
//! canonical serialization of all other fields, so an operator can later
//! answer "was this data anonymized, with what, and has the record of
//! that been altered since" without trusting the storage medium alone.

pub mod entry;
pub mod logger;
pub mod signer;

// Re-export main types
pub use entry::{AuditEntry, AuditOperation};
pub use logger::{AuditLogger, AuditVerificationReport, TamperFinding};
pub use signer::AuditSigner;
