//! Row representation shared with the external syncer
//!
//! The factory consumes and produces plain JSON-shaped rows: a mapping of
//! column name to scalar value. No database types appear anywhere in this
//! crate; the syncer owns the wire format on both sides.

use serde_json::Value;

/// A single row: column name mapped to a scalar cell value.
///
/// Cell values are `serde_json::Value` scalars (null, string, number, bool).
/// Nested arrays/objects may appear for structured columns such as addresses.
pub type Row = serde_json::Map<String, Value>;

/// Builds a [`Row`] from a JSON object value.
///
/// Returns `None` when the value is not an object.
pub fn row_from_value(value: Value) -> Option<Row> {
    match value {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
