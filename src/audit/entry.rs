//! Audit entry model
//!
//! One entry records one anonymization operation: which table and column,
//! which strategy, how many rows, who ran it, when, and under which
//! profile. All fields are flat scalars suitable for SQL storage with no
//! embedded structure requiring further parsing. The signature is computed
//! last and covers every other field; any later mutation invalidates it
//! under verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A signed record of one anonymization operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditEntry {
    pub operation_id: String,
    pub table_name: String,
    pub column_name: String,
    pub strategy_name: String,
    pub rows_affected: u64,
    pub executed_by: String,
    pub executed_at: DateTime<Utc>,
    /// Content hash of the profile that drove the operation
    pub profile_hash: String,
    /// Keyed signature over the canonical serialization of all other fields
    #[serde(default)]
    pub signature: String,
}

/// The facts of one operation, before signing.
#[derive(Debug, Clone)]
pub struct AuditOperation {
    pub table: String,
    pub column: String,
    pub strategy: String,
    pub rows_affected: u64,
    pub executed_by: String,
}

impl AuditEntry {
    /// Builds an unsigned entry with a fresh operation id and timestamp.
    pub fn from_operation(op: &AuditOperation, profile_hash: &str) -> Self {
        Self {
            operation_id: Uuid::new_v4().to_string(),
            table_name: op.table.clone(),
            column_name: op.column.clone(),
            strategy_name: op.strategy.clone(),
            rows_affected: op.rows_affected,
            executed_by: op.executed_by.clone(),
            executed_at: Utc::now(),
            profile_hash: profile_hash.to_string(),
            signature: String::new(),
        }
    }

    /// True once a signature has been attached.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}
