use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a schema field.
///
/// Schema files spell these in lowercase ("integer", "percentage", ...).
/// A tag we do not know deserializes to `Any`, whose values pass through
/// the field validator untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    String,
    Numeric,
    Percentage,
    List,
    #[serde(other)]
    Any,
}

impl FieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Integer => "integer",
            FieldType::String => "string",
            FieldType::Numeric => "numeric",
            FieldType::Percentage => "percentage",
            FieldType::List => "list",
            FieldType::Any => "any",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn known_tags_deserialize() {
        let t: FieldType = serde_json::from_str("\"percentage\"").unwrap();
        assert_eq!(t, FieldType::Percentage);
        let t: FieldType = serde_json::from_str("\"list\"").unwrap();
        assert_eq!(t, FieldType::List);
    }

    #[test]
    fn unknown_tag_is_any() {
        let t: FieldType = serde_json::from_str("\"date\"").unwrap();
        assert_eq!(t, FieldType::Any);
    }
}
