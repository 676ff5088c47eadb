//! List fields.
//!
//! Order of attempts for text:
//! 1) "[...]"-shaped text is parsed as JSON; an array is accepted, any other
//!    JSON value is an error. Text that fails to parse falls through.
//! 2) Text containing a newline is split on newlines, otherwise text
//!    containing a comma is split on commas. Trimmed, non-empty pieces win.
//! 3) Anything else (a single bare item, whitespace) is an invalid list.

use crate::config::ValidatorConfig;
use crate::field::{Cleaned, FieldError, FieldOutcome};
use crate::schema::FieldType;

use serde_json::Value;
use tracing::debug;

pub fn list(value: &Value, config: &ValidatorConfig) -> FieldOutcome {
    match value {
        Value::Array(_) => Ok(Cleaned::exact(value.clone())),
        Value::String(s) => from_text(s, config),
        _ => Err(FieldError::InvalidFormat(FieldType::List)),
    }
}

fn from_text(s: &str, config: &ValidatorConfig) -> FieldOutcome {
    if s.starts_with('[') && s.ends_with(']') {
        match serde_json::from_str::<Value>(s) {
            Ok(parsed @ Value::Array(_)) => return Ok(Cleaned::exact(parsed)),
            Ok(_) => return Err(FieldError::JsonNotList),
            Err(e) => debug!("list text looks like JSON but does not parse: {}", e),
        }
    }

    let separator = if s.contains('\n') {
        '\n'
    } else if s.contains(',') {
        ','
    } else {
        return Err(FieldError::InvalidFormat(FieldType::List));
    };

    let mut items: Vec<String> = s
        .split(separator)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();
    if items.is_empty() {
        return Err(FieldError::InvalidFormat(FieldType::List));
    }

    let found = items.len();
    let mut warning = format!("Converted string to list with {} items", found);
    if let Some(limit) = config.max_list_items {
        if found > limit {
            items.truncate(limit);
            warning = format!(
                "Converted string to list with {} items (kept first {})",
                found, limit
            );
        }
    }

    let value = Value::Array(items.into_iter().map(Value::String).collect());
    Ok(Cleaned::coerced(value, warning))
}
