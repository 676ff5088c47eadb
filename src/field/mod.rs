//! Per-field coercion: turn one raw value into a value of its declared type.
//!
//! Dispatch is a single match on `FieldType`; each arm lives in a submodule.
//! Every failure comes back as a `FieldError` so the caller can keep going
//! with the remaining fields.

pub mod list;
pub mod number;
pub mod percentage;
pub mod text;

use crate::config::ValidatorConfig;
use crate::schema::FieldType;

use serde_json::Value;
use thiserror::Error;

/// A value that passed validation, with an optional note about what was changed.
#[derive(Debug, Clone, PartialEq)]
pub struct Cleaned {
    pub value: Value,
    pub warning: Option<String>,
}

impl Cleaned {
    /// Accepted unchanged.
    pub fn exact(value: Value) -> Self {
        Self {
            value,
            warning: None,
        }
    }

    pub fn coerced(value: Value, warning: impl Into<String>) -> Self {
        Self {
            value,
            warning: Some(warning.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Invalid {0} format")]
    InvalidFormat(FieldType),

    #[error("Percentage value {value} out of range ({min}-{max})")]
    PercentageOutOfRange { value: String, min: f64, max: f64 },

    #[error("Value parses as JSON but not as list")]
    JsonNotList,

    #[error("Validation error: {0}")]
    Internal(String),
}

pub type FieldOutcome = std::result::Result<Cleaned, FieldError>;

/// Null and "" are "not reported" rather than wrong.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Name of a JSON value's type, used in conversion warnings.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate `value` against `field_type`.
pub fn validate_field(value: &Value, field_type: FieldType, config: &ValidatorConfig) -> FieldOutcome {
    if is_blank(value) {
        return Ok(Cleaned::exact(value.clone()));
    }

    match field_type {
        FieldType::Integer => number::integer(value),
        FieldType::Numeric => number::numeric(value),
        FieldType::Percentage => percentage::percentage(value, config),
        FieldType::String => text::string(value),
        FieldType::List => list::list(value, config),
        FieldType::Any => Ok(Cleaned::exact(value.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn blank_values_pass_for_every_type() {
        let config = ValidatorConfig::default();
        for ty in [
            FieldType::Integer,
            FieldType::Numeric,
            FieldType::Percentage,
            FieldType::String,
            FieldType::List,
        ] {
            assert_eq!(validate_field(&Value::Null, ty, &config), Ok(Cleaned::exact(Value::Null)));
            assert_eq!(validate_field(&json!(""), ty, &config), Ok(Cleaned::exact(json!(""))));
        }
    }

    #[test]
    fn any_type_passes_everything_through() {
        let config = ValidatorConfig::default();
        let value = json!({"nested": [1, 2]});
        assert_eq!(
            validate_field(&value, FieldType::Any, &config),
            Ok(Cleaned::exact(value.clone()))
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            FieldError::InvalidFormat(FieldType::Integer).to_string(),
            "Invalid integer format"
        );
        assert_eq!(
            FieldError::PercentageOutOfRange {
                value: "150".to_string(),
                min: 0.0,
                max: 100.0
            }
            .to_string(),
            "Percentage value 150 out of range (0-100)"
        );
        assert_eq!(
            FieldError::Internal("boom".to_string()).to_string(),
            "Validation error: boom"
        );
    }
}
