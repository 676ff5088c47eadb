//! Combine the records extracted from the chunks of one article.
//!
//! For a key seen in several chunks we keep whichever value says the most:
//! an empty value is always replaced, otherwise a non-empty value replaces the
//! kept one only if its text rendering is longer.

use crate::validator::RawRecord;

use serde_json::Value;

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Length of the value as it would be shown to a reader.
fn rendered_len(value: &Value) -> usize {
    match value {
        Value::String(s) => s.chars().count(),
        other => other.to_string().chars().count(),
    }
}

/// Merge per-chunk records; keys keep their first-seen position.
pub fn merge_extractions<'a, I>(records: I) -> RawRecord
where
    I: IntoIterator<Item = &'a RawRecord>,
{
    let mut merged = RawRecord::new();
    for record in records {
        for (key, value) in record {
            match merged.get_mut(key) {
                Some(kept) => {
                    let replace = is_empty(kept)
                        || (!is_empty(value) && rendered_len(value) > rendered_len(kept));
                    if replace {
                        *kept = value.clone();
                    }
                }
                None => {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
    }
    merged
}
