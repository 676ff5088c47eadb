//! CSV export of validation reports: one row per report.
//!
//! Columns are the union of `cleaned_data` keys (first-seen order) followed by
//! `valid`, `errors` and `warnings`. Lists are joined with "; ".

use crate::Result;
use crate::validator::ValidationReport;

use anyhow::Context;
use serde_json::Value;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

const LIST_SEPARATOR: &str = "; ";

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(LIST_SEPARATOR),
        other => other.to_string(),
    }
}

/// Write reports as CSV to any writer.
pub fn write_reports<W: Write>(writer: W, reports: &[ValidationReport]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    if reports.is_empty() {
        out.write_record(["No data available"])?;
        out.flush()?;
        return Ok(());
    }

    let mut columns: Vec<&str> = Vec::new();
    for report in reports {
        for key in report.cleaned_data.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut header = columns.clone();
    header.extend(["valid", "errors", "warnings"]);
    out.write_record(&header)?;

    for report in reports {
        let mut row: Vec<String> = columns
            .iter()
            .map(|c| report.cleaned_data.get(*c).map(cell).unwrap_or_default())
            .collect();
        row.push(report.valid.to_string());
        row.push(report.errors.join(LIST_SEPARATOR));
        row.push(report.warnings.join(LIST_SEPARATOR));
        out.write_record(&row)?;
    }

    out.flush()?;
    Ok(())
}

/// Write reports as a CSV file, creating parent directories as needed.
pub fn write_reports_csv(path: &Path, reports: &[ValidationReport]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output dir {}", parent.display()))?;
        }
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_reports(file, reports).with_context(|| format!("write csv {}", path.display()))?;

    if reports.is_empty() {
        warn!("no data to write to {}", path.display());
    } else {
        info!("wrote {} rows to {}", reports.len(), path.display());
    }
    Ok(())
}
