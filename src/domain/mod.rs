//! Core domain types for Cloak
//!
//! This module contains the error hierarchy, the crate-wide result alias,
//! and the row representation exchanged with the external syncer.

pub mod errors;
pub mod result;
pub mod row;

// Re-export commonly used types
pub use errors::CloakError;
pub use result::Result;
pub use row::{row_from_value, Row};
