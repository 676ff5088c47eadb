//! Field-name normalization: map whatever key the LLM produced onto the
//! canonical schema name.
//!
//! Keys are lower-cased and every whitespace character becomes `_`; the
//! result is then looked up in a fixed synonym table. Keys with no synonym
//! come back in their lower-cased/underscored form, so
//! "Primary Outcome" -> "primary_outcome". Nothing is trimmed: " n" -> "_n".

use crate::validator::RawRecord;

/// Lower-case a key and replace each whitespace character with `_`.
fn fold_key(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

fn synonym(key: &str) -> Option<&'static str> {
    let canonical = match key {
        "n" | "number_of_patients" | "patient_count" | "subject_count" | "total_patients"
        | "number_of_subjects" | "study_population" | "participants"
        | "number_of_participants" => "sample_size",

        "age_mean" | "average_age" | "age_years" => "mean_age",
        "age_median" => "median_age",

        "gender" | "sex_distribution" | "sex" => "gender_distribution",

        "male" | "males" | "percent_male" | "male_percent" => "male_percentage",
        "female" | "females" | "percent_female" | "female_percent" => "female_percentage",

        "race" | "race_ethnicity" => "ethnicity",
        "inclusion" => "inclusion_criteria",
        "exclusion" => "exclusion_criteria",
        "body_mass_index" => "bmi",
        "follow_up" | "followup" | "follow-up" | "follow-up_period" => "follow_up_period",

        _ => return None,
    };
    Some(canonical)
}

/// Map a raw key to its canonical schema name (or its folded form).
pub fn normalize_key(raw: &str) -> String {
    let folded = fold_key(raw);
    match synonym(&folded) {
        Some(canonical) => canonical.to_string(),
        None => folded,
    }
}

/// Rename every key of a record; values are kept as-is.
///
/// When two keys collapse onto the same name the later one wins.
pub fn normalize_record(record: &RawRecord) -> RawRecord {
    let mut out = RawRecord::new();
    for (key, value) in record {
        out.insert(normalize_key(key), value.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn sample_size_synonyms() {
        for raw in ["n", "N", "number_of_patients", "Patient Count", "Number of subjects"] {
            assert_eq!(normalize_key(raw), "sample_size", "raw key {:?}", raw);
        }
    }

    #[test]
    fn other_synonyms() {
        assert_eq!(normalize_key("age_mean"), "mean_age");
        assert_eq!(normalize_key("Average Age"), "mean_age");
        assert_eq!(normalize_key("gender"), "gender_distribution");
        assert_eq!(normalize_key("Male"), "male_percentage");
        assert_eq!(normalize_key("percent female"), "female_percentage");
    }

    #[test]
    fn canonical_and_unknown_keys_pass_through_folded() {
        assert_eq!(normalize_key("sample_size"), "sample_size");
        assert_eq!(normalize_key("Primary Outcome"), "primary_outcome");
        assert_eq!(normalize_key("Primary\tOutcome"), "primary_outcome");
        assert_eq!(normalize_key("HbA1c"), "hba1c");
    }

    #[test]
    fn whitespace_is_replaced_not_trimmed() {
        assert_eq!(normalize_key(" n"), "_n");
        assert_eq!(normalize_key("Patient  Count"), "patient__count");
        assert_eq!(normalize_key("mean age "), "mean_age_");
    }

    #[test]
    fn record_keys_are_renamed_values_kept() {
        let record = json!({"n": 100, "age_mean": 65, "gender": "male: 55%, female: 45%"});
        let normalized = normalize_record(record.as_object().unwrap());
        assert_eq!(
            serde_json::Value::Object(normalized),
            json!({"sample_size": 100, "mean_age": 65, "gender_distribution": "male: 55%, female: 45%"})
        );
    }
}
