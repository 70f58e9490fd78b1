use crate::database::BackendRow;
use crate::error::{ActionError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;

/// Primary key type shared by all records
pub type RecordId = i64;

/// A persisted type an [`Action`](crate::action::Action) can read and write.
///
/// Column values for INSERT and UPDATE come from the type's `Serialize`
/// output, which must be a flat JSON object whose keys are column names.
/// Reads decode rows through `FromRow`.
pub trait Record:
    Serialize + for<'r> FromRow<'r, BackendRow> + Send + Sync + Unpin + 'static
{
    fn table_name() -> &'static str;

    fn primary_key() -> &'static str {
        "id"
    }

    /// Integer tombstone column; `None` turns deletes into physical deletes
    fn soft_delete_column() -> Option<&'static str> {
        Some("deleted_at")
    }

    /// Column never rewritten by struct updates
    fn created_at_column() -> Option<&'static str> {
        Some("created_at")
    }

    /// Column stamped by every update
    fn updated_at_column() -> Option<&'static str> {
        Some("updated_at")
    }

    /// Primary key value; `0` means not yet persisted
    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    /// Stamp in-memory timestamps before the record is written
    fn touch(&mut self, _now: DateTime<Utc>, _created: bool) {}
}

/// Serialize `record` into its column map
pub(crate) fn column_values<T: Record>(record: &T, table: &str) -> Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(columns) => Ok(columns),
        other => Err(ActionError::invalid_record(
            table,
            format!("expected a JSON object, got {}", json_kind(&other)),
        )),
    }
}

/// Zero values are skipped by struct updates
pub(crate) fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_zero_values() {
        for value in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(is_zero(&value), "{value} should be zero");
        }
        for value in [json!(true), json!(-1), json!(0.5), json!("x"), json!([0]), json!({"a": 0})] {
            assert!(!is_zero(&value), "{value} should not be zero");
        }
    }
}
