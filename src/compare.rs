//! Compare two extractions of the same article (e.g. two prompt versions).
//!
//! Keys are normalized first so that "n" and "sample_size" line up.

use crate::normalize::normalize_record;
use crate::validator::RawRecord;

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueDiff {
    pub left: Value,
    pub right: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldCounts {
    pub total_unique: usize,
    pub common: usize,
    pub only_in_left: usize,
    pub only_in_right: usize,
    pub different_values: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub fields: FieldCounts,
    pub only_in_left: Vec<String>,
    pub only_in_right: Vec<String>,
    pub differences: BTreeMap<String, ValueDiff>,
    /// 1.0 when both sides agree on every field, 0.0 when nothing matches.
    pub similarity_score: f64,
}

pub fn compare_records(left: &RawRecord, right: &RawRecord) -> Comparison {
    let left = normalize_record(left);
    let right = normalize_record(right);

    let left_keys: BTreeSet<&String> = left.keys().collect();
    let right_keys: BTreeSet<&String> = right.keys().collect();

    let only_in_left: Vec<String> = left_keys.difference(&right_keys).map(|k| k.to_string()).collect();
    let only_in_right: Vec<String> = right_keys.difference(&left_keys).map(|k| k.to_string()).collect();
    let common: Vec<&String> = left_keys.intersection(&right_keys).copied().collect();
    let total_unique = left_keys.union(&right_keys).count();

    let mut differences = BTreeMap::new();
    for key in &common {
        let (l, r) = (&left[key.as_str()], &right[key.as_str()]);
        if l != r {
            differences.insert(
                key.to_string(),
                ValueDiff {
                    left: l.clone(),
                    right: r.clone(),
                },
            );
        }
    }

    let mismatched = only_in_left.len() + only_in_right.len() + differences.len();
    let similarity_score = 1.0 - mismatched as f64 / total_unique.max(1) as f64;

    Comparison {
        fields: FieldCounts {
            total_unique,
            common: common.len(),
            only_in_left: only_in_left.len(),
            only_in_right: only_in_right.len(),
            different_values: differences.len(),
        },
        only_in_left,
        only_in_right,
        differences,
        similarity_score,
    }
}
