//! Cross-field plausibility checks, run over cleaned values once every field
//! has been validated on its own. Findings never make a report invalid.

use crate::config::ValidatorConfig;
use crate::validator::RawRecord;

use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::sync::LazyLock;

static AGE_RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*[-–]\s*(\d+)").expect("age range regex compiles"));

#[derive(Debug, Clone, PartialEq)]
pub enum Inconsistency {
    /// male_percentage + female_percentage is not (close to) 100.
    GenderSum { total: f64 },

    /// mean_age lies outside the bounds stated in age_range.
    MeanAgeOutsideRange { mean: f64, min: u64, max: u64 },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::GenderSum { total } => {
                write!(f, "Gender percentages add up to {}%, not 100%", total)
            }
            Inconsistency::MeanAgeOutsideRange { mean, min, max } => {
                write!(f, "Mean age ({}) outside of age range ({}-{})", mean, min, max)
            }
        }
    }
}

/// Cleaned percentages are either JSON numbers or "<number>%" text.
fn percentage_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn parse_age_range(text: &str) -> Option<(u64, u64)> {
    let caps = AGE_RANGE_RE.captures(text)?;
    let min = caps[1].parse().ok()?;
    let max = caps[2].parse().ok()?;
    Some((min, max))
}

fn check_gender_sum(cleaned: &RawRecord, config: &ValidatorConfig) -> Option<Inconsistency> {
    let male = percentage_value(cleaned.get("male_percentage")?)?;
    let female = percentage_value(cleaned.get("female_percentage")?)?;
    let total = male + female;
    ((total - 100.0).abs() > config.gender_sum_tolerance).then_some(Inconsistency::GenderSum { total })
}

fn check_mean_age(cleaned: &RawRecord) -> Option<Inconsistency> {
    let mean = cleaned.get("mean_age")?.as_f64()?;
    // Unparseable ranges skip the check.
    let (min, max) = parse_age_range(cleaned.get("age_range")?.as_str()?)?;
    let inside = (min as f64) <= mean && mean <= (max as f64);
    (!inside).then_some(Inconsistency::MeanAgeOutsideRange { mean, min, max })
}

/// Run every check over a record's cleaned values.
pub fn check_consistency(cleaned: &RawRecord, config: &ValidatorConfig) -> Vec<Inconsistency> {
    [check_gender_sum(cleaned, config), check_mean_age(cleaned)]
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn check(value: Value) -> Vec<String> {
        check_consistency(value.as_object().unwrap(), &ValidatorConfig::default())
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn gender_sum_off_by_one() {
        assert_eq!(
            check(json!({"male_percentage": 52, "female_percentage": 49})),
            vec!["Gender percentages add up to 101%, not 100%".to_string()]
        );
    }

    #[test]
    fn gender_sum_exact_or_within_tolerance() {
        assert!(check(json!({"male_percentage": 50, "female_percentage": 50})).is_empty());
        assert!(check(json!({"male_percentage": "33.35%", "female_percentage": 66.7})).is_empty());
    }

    #[test]
    fn gender_sum_reads_normalized_text() {
        assert_eq!(
            check(json!({"male_percentage": "60%", "female_percentage": "50%"})),
            vec!["Gender percentages add up to 110%, not 100%".to_string()]
        );
    }

    #[test]
    fn gender_sum_needs_both_sides() {
        assert!(check(json!({"male_percentage": 52})).is_empty());
        assert!(check(json!({"male_percentage": 52, "female_percentage": null})).is_empty());
    }

    #[test]
    fn mean_age_outside_range() {
        assert_eq!(
            check(json!({"mean_age": 45, "age_range": "25-40"})),
            vec!["Mean age (45) outside of age range (25-40)".to_string()]
        );
        assert_eq!(
            check(json!({"mean_age": 18.5, "age_range": "25 - 40 years"})),
            vec!["Mean age (18.5) outside of age range (25-40)".to_string()]
        );
    }

    #[test]
    fn mean_age_inside_range_or_unparseable() {
        assert!(check(json!({"mean_age": 30, "age_range": "25-40"})).is_empty());
        assert!(check(json!({"mean_age": 25, "age_range": "25–40"})).is_empty());
        assert!(check(json!({"mean_age": 45, "age_range": "invalid"})).is_empty());
        assert!(check(json!({"mean_age": 45, "age_range": ["25", "40"]})).is_empty());
    }

    #[test]
    fn wider_tolerance_silences_small_drift() {
        let config = ValidatorConfig {
            gender_sum_tolerance: 2.0,
            ..ValidatorConfig::default()
        };
        let record = json!({"male_percentage": 52, "female_percentage": 49});
        assert!(check_consistency(record.as_object().unwrap(), &config).is_empty());
    }
}
