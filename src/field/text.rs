//! String fields: text passes as-is, anything else is rendered to text.

use crate::field::{Cleaned, FieldOutcome, type_name};

use serde_json::Value;

pub fn string(value: &Value) -> FieldOutcome {
    match value {
        Value::String(_) => Ok(Cleaned::exact(value.clone())),
        other => Ok(Cleaned::coerced(
            Value::String(other.to_string()),
            format!("Converted {} to string", type_name(other)),
        )),
    }
}
