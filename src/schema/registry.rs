//! Schema registry: canonical field name -> {type, required}.
//!
//! The default registry carries the clinical patient-characteristic fields.
//! A custom registry replaces it wholesale; there is no merging.
//!
//! JSON shape of a custom schema file:
//! {
//!   "sample_size": { "type": "integer", "required": true },
//!   "mean_age":    { "type": "numeric" }
//! }

use crate::Result;
use crate::schema::FieldType;

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    #[serde(rename = "type")]
    pub field_type: FieldType,

    #[serde(default)]
    pub required: bool,
}

impl SchemaEntry {
    pub fn required(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: true,
        }
    }

    pub fn optional(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
        }
    }
}

/// Immutable set of schema entries, keyed by canonical field name.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRegistry {
    entries: BTreeMap<String, SchemaEntry>,
}

impl SchemaRegistry {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, SchemaEntry)>,
        S: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, entry)| (name.into(), entry))
                .collect(),
        }
    }

    /// Parse a custom schema from its JSON text.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let entries: BTreeMap<String, SchemaEntry> =
            serde_json::from_str(text).context("parse schema json")?;
        if entries.is_empty() {
            bail!("schema must define at least 1 field");
        }
        Ok(Self { entries })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read schema file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("bad schema in {}", path.display()))
    }

    pub fn get(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &SchemaEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Required field names in sorted order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, e)| e.required)
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new([
            ("sample_size", SchemaEntry::required(FieldType::Integer)),
            ("age", SchemaEntry::optional(FieldType::String)),
            ("age_range", SchemaEntry::optional(FieldType::String)),
            ("mean_age", SchemaEntry::optional(FieldType::Numeric)),
            ("median_age", SchemaEntry::optional(FieldType::Numeric)),
            ("gender_distribution", SchemaEntry::optional(FieldType::String)),
            ("male_percentage", SchemaEntry::optional(FieldType::Percentage)),
            ("female_percentage", SchemaEntry::optional(FieldType::Percentage)),
            ("ethnicity", SchemaEntry::optional(FieldType::String)),
            ("inclusion_criteria", SchemaEntry::optional(FieldType::List)),
            ("exclusion_criteria", SchemaEntry::optional(FieldType::List)),
            ("comorbidities", SchemaEntry::optional(FieldType::List)),
            ("medications", SchemaEntry::optional(FieldType::List)),
            ("bmi", SchemaEntry::optional(FieldType::Numeric)),
            ("follow_up_period", SchemaEntry::optional(FieldType::String)),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_registry_requires_only_sample_size() {
        let schema = SchemaRegistry::default();
        assert_eq!(schema.required_fields().collect::<Vec<_>>(), vec!["sample_size"]);
        assert_eq!(
            schema.get("male_percentage").map(|e| e.field_type),
            Some(FieldType::Percentage)
        );
        assert!(!schema.contains("primary_outcome"));
    }

    #[test]
    fn custom_schema_replaces_default() {
        let schema = SchemaRegistry::from_json_str(
            r#"{"n_arms": {"type": "integer", "required": true}, "notes": {"type": "string"}}"#,
        )
        .unwrap();
        assert_eq!(schema.len(), 2);
        assert!(!schema.contains("sample_size"));
        assert_eq!(schema.get("notes"), Some(&SchemaEntry::optional(FieldType::String)));
    }

    #[test]
    fn empty_schema_is_rejected() {
        assert!(SchemaRegistry::from_json_str("{}").is_err());
    }

    #[test]
    fn malformed_schema_is_rejected() {
        assert!(SchemaRegistry::from_json_str(r#"{"x": {"required": true}}"#).is_err());
    }
}
