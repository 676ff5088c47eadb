//! Integer and numeric fields.
//!
//! Native JSON numbers are taken as they are. Text is scanned for the first
//! numeric token ("150 patients" -> 150, "58.3 years" -> 58.3).

use crate::field::{Cleaned, FieldError, FieldOutcome};
use crate::schema::FieldType;

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digits regex compiles"));

static DECIMAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("decimal regex compiles"));

fn extracted_warning(token: &str, source: &str) -> Option<String> {
    (token != source).then(|| format!("Extracted '{}' from '{}'", token, source))
}

pub fn integer(value: &Value) -> FieldOutcome {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => Ok(Cleaned::exact(value.clone())),
        Value::String(s) => {
            let token = DIGITS_RE
                .find(s)
                .ok_or(FieldError::InvalidFormat(FieldType::Integer))?
                .as_str();
            let parsed: i64 = token
                .parse()
                .map_err(|e: std::num::ParseIntError| FieldError::Internal(e.to_string()))?;
            Ok(Cleaned {
                value: Value::from(parsed),
                warning: extracted_warning(token, s),
            })
        }
        _ => Err(FieldError::InvalidFormat(FieldType::Integer)),
    }
}

pub fn numeric(value: &Value) -> FieldOutcome {
    match value {
        Value::Number(_) => Ok(Cleaned::exact(value.clone())),
        Value::String(s) => {
            let token = DECIMAL_RE
                .find(s)
                .ok_or(FieldError::InvalidFormat(FieldType::Numeric))?
                .as_str();
            let parsed: f64 = token
                .parse()
                .map_err(|e: std::num::ParseFloatError| FieldError::Internal(e.to_string()))?;
            if !parsed.is_finite() {
                return Err(FieldError::Internal(format!("number {} out of range", token)));
            }
            Ok(Cleaned {
                value: Value::from(parsed),
                warning: extracted_warning(token, s),
            })
        }
        _ => Err(FieldError::InvalidFormat(FieldType::Numeric)),
    }
}
