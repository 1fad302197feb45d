//! JSON encoding of the expense list
//!
//! The exchange format is a bare, pretty-printed array of expense objects.
//! Only the array and the object shape of each element are checked; field
//! values are read leniently and written back as they came in.

use serde_json::Value;

use crate::error::{TrackerError, TrackerResult};
use crate::models::Expense;

/// Serialize records as a pretty-printed JSON array
pub fn encode(records: &[Expense]) -> TrackerResult<String> {
    serde_json::to_string_pretty(records)
        .map_err(|e| TrackerError::Export(format!("Failed to serialize expenses: {}", e)))
}

/// Parse a JSON array of expense objects
pub fn decode(text: &str) -> TrackerResult<Vec<Expense>> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| TrackerError::Parse(format!("Invalid JSON: {}", e)))?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(TrackerError::Parse(format!(
                "Expected a JSON array of expenses, found {}",
                kind_of(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(object) => Ok(Expense::from_object(object)),
            other => Err(TrackerError::Parse(format!(
                "Element {} is {}, not an expense object",
                index,
                kind_of(&other)
            ))),
        })
        .collect()
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
