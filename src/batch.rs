//! File-level validation: one extraction JSON file, or every `*.json` file in
//! a directory. Directory runs validate files in parallel with rayon; the
//! validator is shared read-only across workers.

use crate::Result;
use crate::field::type_name;
use crate::validator::{ExtractionValidator, RawRecord, ValidationReport};

use anyhow::{Context, bail};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const SUMMARY_FILE_NAME: &str = "validation_summary.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    pub file: String,
    pub valid: bool,
    pub error_count: usize,
    pub warning_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub files_processed: usize,
    pub valid_files: usize,
    pub invalid_files: usize,
    pub file_results: Vec<FileResult>,
}

fn load_record(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

/// Read a JSON file that must hold an object of fields.
pub fn read_record(path: &Path) -> Result<RawRecord> {
    match load_record(path)? {
        Value::Object(record) => Ok(record),
        other => bail!(
            "{} holds a JSON {}, expected an object of fields",
            path.display(),
            type_name(&other)
        ),
    }
}

/// Validate one extraction file. Unreadable or malformed files come back as
/// an invalid report carrying a `Processing error: ...` message.
pub fn validate_file(validator: &ExtractionValidator, path: &Path) -> ValidationReport {
    let report = match load_record(path) {
        Ok(value) => validator.validate_value(&value),
        Err(e) => {
            warn!("cannot validate {}: {:#}", path.display(), e);
            ValidationReport::failed(format!("Processing error: {:#}", e))
        }
    };

    if report.valid {
        info!(file = %path.display(), warnings = report.warnings.len(), "validation passed");
    } else {
        warn!(file = %path.display(), errors = report.errors.len(), "validation failed");
    }
    report
}

/// Write `{"file": <source>, "validation": <report>}` as pretty JSON.
pub fn write_file_report(source: &Path, report: &ValidationReport, out: &Path) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create output dir {}", parent.display()))?;
        }
    }
    let doc = json!({
        "file": source.display().to_string(),
        "validation": report,
    });
    fs::write(out, serde_json::to_string_pretty(&doc)?)
        .with_context(|| format!("write {}", out.display()))?;
    Ok(())
}

/// `*.json` files directly inside `dir`, sorted by name.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Validate every `*.json` file in `dir`.
///
/// With `out_dir`, each report is written to `validation_<stem>.json` and the
/// summary to `validation_summary.json`.
pub fn validate_dir(
    validator: &ExtractionValidator,
    dir: &Path,
    out_dir: Option<&Path>,
) -> Result<(BatchSummary, Vec<(PathBuf, ValidationReport)>)> {
    let files = list_json_files(dir)?;
    if files.is_empty() {
        warn!("no JSON files found in {}", dir.display());
    }
    if let Some(out_dir) = out_dir {
        fs::create_dir_all(out_dir)
            .with_context(|| format!("create output dir {}", out_dir.display()))?;
    }

    let reports: Vec<(PathBuf, ValidationReport)> = files
        .par_iter()
        .map(|path| -> Result<(PathBuf, ValidationReport)> {
            let report = validate_file(validator, path);
            if let Some(out_dir) = out_dir {
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let out = out_dir.join(format!("validation_{}.json", stem));
                write_file_report(path, &report, &out)?;
            }
            Ok((path.clone(), report))
        })
        .collect::<Result<_>>()?;

    let file_results: Vec<FileResult> = reports
        .iter()
        .map(|(path, report)| FileResult {
            file: file_name(path),
            valid: report.valid,
            error_count: report.errors.len(),
            warning_count: report.warnings.len(),
        })
        .collect();
    let valid_files = file_results.iter().filter(|r| r.valid).count();
    let summary = BatchSummary {
        files_processed: file_results.len(),
        valid_files,
        invalid_files: file_results.len() - valid_files,
        file_results,
    };

    if let Some(out_dir) = out_dir {
        let path = out_dir.join(SUMMARY_FILE_NAME);
        fs::write(&path, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("write {}", path.display()))?;
    }

    info!(
        "validation complete: {}/{} files valid",
        summary.valid_files, summary.files_processed
    );
    Ok((summary, reports))
}
