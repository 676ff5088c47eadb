//! Extraction validator: runs a raw record through key normalization,
//! per-field validation and the consistency checks, and folds everything
//! into one `ValidationReport`.
//!
//! The validator holds only immutable state (schema + config), so a single
//! instance can be shared across threads and called concurrently.

use crate::config::ValidatorConfig;
use crate::consistency::check_consistency;
use crate::field::{FieldOutcome, type_name, validate_field};
use crate::normalize::normalize_key;
use crate::schema::SchemaRegistry;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Field name -> value, as produced by parsing an LLM response.
pub type RawRecord = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub cleaned_data: RawRecord,
}

impl ValidationReport {
    /// Report for input that carried no fields at all.
    pub fn no_data() -> Self {
        Self::failed("No data provided")
    }

    /// Report with a single error and nothing cleaned.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![error.into()],
            warnings: Vec::new(),
            cleaned_data: RawRecord::new(),
        }
    }
}

/// What the validator decided about one raw key.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEntry {
    /// The key maps to a schema field and its value went through validation.
    Known {
        field: String,
        source_key: String,
        outcome: FieldOutcome,
    },

    /// The key is not in the schema; the value is carried along unchecked.
    Unrecognized { name: String, value: Value },

    /// A later key that normalized onto a name already seen in this record.
    Duplicate { name: String, source_key: String },
}

#[derive(Debug, Clone, Default)]
pub struct ExtractionValidator {
    schema: SchemaRegistry,
    config: ValidatorConfig,
}

impl ExtractionValidator {
    pub fn new(schema: SchemaRegistry, config: ValidatorConfig) -> Self {
        Self { schema, config }
    }

    pub fn with_schema(schema: SchemaRegistry) -> Self {
        Self::new(schema, ValidatorConfig::default())
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Normalize every key of `raw` and validate the ones the schema knows.
    ///
    /// Entries come back in input order. When several keys normalize onto the
    /// same name, the first one is used.
    pub fn classify(&self, raw: &RawRecord) -> Vec<FieldEntry> {
        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(raw.len());

        for (key, value) in raw {
            let name = normalize_key(key);
            if !seen.insert(name.clone()) {
                entries.push(FieldEntry::Duplicate {
                    name,
                    source_key: key.clone(),
                });
                continue;
            }

            match self.schema.get(&name) {
                Some(entry) => {
                    let outcome = validate_field(value, entry.field_type, &self.config);
                    debug!(
                        field = %name,
                        source_key = %key,
                        field_type = %entry.field_type,
                        value_type = type_name(value),
                        ok = outcome.is_ok(),
                        "validated field"
                    );
                    entries.push(FieldEntry::Known {
                        field: name,
                        source_key: key.clone(),
                        outcome,
                    });
                }
                None => {
                    debug!(field = %name, source_key = %key, "field not in schema");
                    entries.push(FieldEntry::Unrecognized {
                        name,
                        value: value.clone(),
                    });
                }
            }
        }

        entries
    }

    /// Validate one raw record. Never fails: problems land in the report.
    pub fn validate(&self, raw: &RawRecord) -> ValidationReport {
        if raw.is_empty() {
            return ValidationReport::no_data();
        }

        let entries = self.classify(raw);

        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut cleaned_data = RawRecord::new();

        let present: BTreeSet<&str> = entries
            .iter()
            .filter_map(|e| match e {
                FieldEntry::Known { field, .. } => Some(field.as_str()),
                _ => None,
            })
            .collect();
        for name in self.schema.required_fields() {
            if !present.contains(name) {
                errors.push(format!("Required field '{}' is missing", name));
            }
        }

        for entry in entries {
            match entry {
                FieldEntry::Known {
                    field,
                    outcome: Ok(cleaned),
                    ..
                } => {
                    if let Some(warning) = cleaned.warning {
                        warnings.push(format!("{}: {}", field, warning));
                    }
                    cleaned_data.insert(field, cleaned.value);
                }
                FieldEntry::Known {
                    field,
                    outcome: Err(err),
                    ..
                } => {
                    errors.push(format!("{}: {}", field, err));
                }
                FieldEntry::Unrecognized { name, value } => {
                    warnings.push(format!("Unexpected field '{}' not in schema", name));
                    cleaned_data.insert(name, value);
                }
                FieldEntry::Duplicate { name, source_key } => {
                    warnings.push(format!(
                        "Field '{}' given more than once (ignored '{}')",
                        name, source_key
                    ));
                }
            }
        }

        warnings.extend(
            check_consistency(&cleaned_data, &self.config)
                .iter()
                .map(ToString::to_string),
        );

        let report = ValidationReport {
            valid: errors.is_empty(),
            errors,
            warnings,
            cleaned_data,
        };
        debug!(
            valid = report.valid,
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            fields = report.cleaned_data.len(),
            "validated record"
        );
        report
    }

    /// Validate an arbitrary JSON value; only objects carry fields.
    pub fn validate_value(&self, raw: &Value) -> ValidationReport {
        match raw {
            Value::Null => ValidationReport::no_data(),
            Value::Object(record) => self.validate(record),
            other => ValidationReport::failed(format!(
                "Expected an object of fields, got {}",
                type_name(other)
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, SchemaEntry};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn validate(value: Value) -> ValidationReport {
        ExtractionValidator::default().validate_value(&value)
    }

    #[test]
    fn empty_and_null_records_short_circuit() {
        let expected = ValidationReport {
            valid: false,
            errors: vec!["No data provided".to_string()],
            warnings: vec![],
            cleaned_data: RawRecord::new(),
        };
        assert_eq!(validate(json!({})), expected);
        assert_eq!(validate(Value::Null), expected);
    }

    #[test]
    fn non_object_input_is_reported() {
        let report = validate(json!(["sample_size", 10]));
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Expected an object of fields, got array".to_string()]);
    }

    #[test]
    fn valid_record() {
        let report = validate(json!({
            "sample_size": 150,
            "mean_age": 58.3,
            "age_range": "45-70 years",
            "male_percentage": 60,
            "female_percentage": 40,
            "inclusion_criteria": ["HbA1c > 7.5%", "BMI > 25 kg/m²"],
        }));
        assert!(report.valid);
        assert_eq!(report.errors, Vec::<String>::new());
        assert_eq!(report.warnings, Vec::<String>::new());
        assert_eq!(report.cleaned_data.get("sample_size"), Some(&json!(150)));
    }

    #[test]
    fn missing_required_field_is_one_error() {
        let report = validate(json!({"mean_age": "58.3 years", "bmi": 27.1}));
        assert!(!report.valid);
        assert_eq!(report.errors, vec!["Required field 'sample_size' is missing".to_string()]);
        assert_eq!(report.cleaned_data.get("mean_age"), Some(&json!(58.3)));
        assert_eq!(report.cleaned_data.get("bmi"), Some(&json!(27.1)));
    }

    #[test]
    fn synonym_satisfies_required_field() {
        let report = validate(json!({"n": "75 patients"}));
        assert!(report.valid);
        assert_eq!(report.cleaned_data.get("sample_size"), Some(&json!(75)));
        assert_eq!(
            report.warnings,
            vec!["sample_size: Extracted '75' from '75 patients'".to_string()]
        );
    }

    #[test]
    fn type_errors_drop_the_field_only() {
        let report = validate(json!({
            "sample_size": 40,
            "male_percentage": 150,
            "bmi": "not recorded",
        }));
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            vec![
                "male_percentage: Percentage value 150 out of range (0-100)".to_string(),
                "bmi: Invalid numeric format".to_string(),
            ]
        );
        assert_eq!(report.cleaned_data, json!({"sample_size": 40}).as_object().unwrap().clone());
    }

    #[test]
    fn unknown_field_passes_through_with_one_warning() {
        let report = validate(json!({"sample_size": 10, "Primary Outcome": "HbA1c reduction"}));
        assert!(report.valid);
        assert_eq!(
            report.warnings,
            vec!["Unexpected field 'primary_outcome' not in schema".to_string()]
        );
        assert_eq!(
            report.cleaned_data.get("primary_outcome"),
            Some(&json!("HbA1c reduction"))
        );
    }

    #[test]
    fn duplicate_keys_keep_first() {
        let report = validate(json!({"sample_size": 10, "N": 12}));
        assert!(report.valid);
        assert_eq!(report.cleaned_data.get("sample_size"), Some(&json!(10)));
        assert_eq!(
            report.warnings,
            vec!["Field 'sample_size' given more than once (ignored 'N')".to_string()]
        );
    }

    #[test]
    fn consistency_findings_are_warnings() {
        let report = validate(json!({
            "sample_size": 100,
            "male_percentage": 60,
            "female_percentage": 50,
            "mean_age": 45,
            "age_range": "25-40",
        }));
        assert!(report.valid);
        assert_eq!(
            report.warnings,
            vec![
                "Gender percentages add up to 110%, not 100%".to_string(),
                "Mean age (45) outside of age range (25-40)".to_string(),
            ]
        );
    }

    #[test]
    fn custom_schema_replaces_default() {
        let schema = SchemaRegistry::new([
            ("arm_count", SchemaEntry::required(FieldType::Integer)),
            ("arm_labels", SchemaEntry::optional(FieldType::List)),
        ]);
        let validator = ExtractionValidator::with_schema(schema);
        let report = validator.validate_value(&json!({"arm_labels": "placebo, drug", "sample_size": 5}));
        assert_eq!(report.errors, vec!["Required field 'arm_count' is missing".to_string()]);
        assert_eq!(
            report.warnings,
            vec![
                "arm_labels: Converted string to list with 2 items".to_string(),
                "Unexpected field 'sample_size' not in schema".to_string(),
            ]
        );
    }

    #[test]
    fn classify_marks_known_and_unrecognized() {
        let raw = json!({"Patient Count": 20, "site": "Oslo"});
        let entries = ExtractionValidator::default().classify(raw.as_object().unwrap());
        assert_eq!(entries.len(), 2);
        assert!(matches!(
            &entries[0],
            FieldEntry::Known { field, source_key, outcome: Ok(_) }
                if field == "sample_size" && source_key == "Patient Count"
        ));
        assert!(matches!(
            &entries[1],
            FieldEntry::Unrecognized { name, .. } if name == "site"
        ));
    }

    #[test]
    fn validator_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtractionValidator>();
    }
}
