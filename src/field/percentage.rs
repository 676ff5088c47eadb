//! Percentage fields.
//!
//! Native numbers are range-checked and kept as numbers. Text is normalized
//! to the canonical "<number>%" form: first against the strict pattern
//! ("52%", "52 %"), then a looser one that also finds "52 percent" inside
//! longer text. Either way the number is range-checked.

use crate::config::ValidatorConfig;
use crate::field::{Cleaned, FieldError, FieldOutcome};
use crate::schema::FieldType;

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static STRICT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}(?:\.\d+)?)\s*%$").expect("strict percentage regex compiles")
});

static LOOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*(?:%|percent)").expect("loose percentage regex compiles")
});

fn out_of_range(value: String, config: &ValidatorConfig) -> FieldError {
    FieldError::PercentageOutOfRange {
        value,
        min: config.percentage_min,
        max: config.percentage_max,
    }
}

pub fn percentage(value: &Value, config: &ValidatorConfig) -> FieldOutcome {
    match value {
        Value::Number(n) => {
            let v = n
                .as_f64()
                .ok_or_else(|| FieldError::Internal(format!("cannot read {} as a number", n)))?;
            if config.percentage_in_range(v) {
                Ok(Cleaned::exact(value.clone()))
            } else {
                Err(out_of_range(n.to_string(), config))
            }
        }
        Value::String(s) => from_text(s, config),
        _ => Err(FieldError::InvalidFormat(FieldType::Percentage)),
    }
}

fn from_text(s: &str, config: &ValidatorConfig) -> FieldOutcome {
    let lowered = s.to_lowercase();
    let caps = STRICT_RE
        .captures(s)
        .or_else(|| LOOSE_RE.captures(&lowered))
        .ok_or(FieldError::InvalidFormat(FieldType::Percentage))?;
    let token = &caps[1];

    let v: f64 = token
        .parse()
        .map_err(|e: std::num::ParseFloatError| FieldError::Internal(e.to_string()))?;
    if !config.percentage_in_range(v) {
        return Err(out_of_range(token.to_string(), config));
    }

    let canonical = format!("{}%", token);
    if canonical == s {
        Ok(Cleaned::exact(Value::String(canonical)))
    } else {
        let warning = format!("Normalized '{}' to '{}'", s, canonical);
        Ok(Cleaned::coerced(Value::String(canonical), warning))
    }
}
