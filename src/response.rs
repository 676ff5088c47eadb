//! Turn an LLM completion into a raw record.
//!
//! Models answer either with a JSON object (possibly wrapped in prose or a
//! code fence) or with "key: value" lines. We try the JSON reading first.

use crate::validator::RawRecord;

use serde_json::Value;
use tracing::{debug, warn};

/// Key under which an unparseable completion is kept verbatim.
pub const RAW_EXTRACTION_KEY: &str = "raw_extraction";

/// Parse a completion into a raw record.
///
/// - If the text has a `{` ... `}` span, that span (first `{` to last `}`)
///   must be a JSON object. Any other span yields `{"raw_extraction": <text>}`.
/// - Otherwise every line holding a `:` becomes one entry.
pub fn parse_completion(completion: &str) -> RawRecord {
    if let (Some(start), Some(end)) = (completion.find('{'), completion.rfind('}')) {
        if start < end {
            return match serde_json::from_str::<RawRecord>(&completion[start..=end]) {
                Ok(record) => record,
                Err(e) => {
                    warn!("failed to parse completion JSON: {}", e);
                    let mut record = RawRecord::new();
                    record.insert(
                        RAW_EXTRACTION_KEY.to_string(),
                        Value::String(completion.to_string()),
                    );
                    record
                }
            };
        }
    }

    debug!("completion has no JSON object; reading key: value lines");
    parse_key_value_lines(completion)
}

fn parse_key_value_lines(text: &str) -> RawRecord {
    let mut record = RawRecord::new();
    for line in text.lines() {
        let line = line.trim();
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().trim_start_matches(['-', '*']).trim();
        if key.is_empty() {
            continue;
        }
        record.insert(key.to_string(), Value::String(value.trim().to_string()));
    }
    record
}
