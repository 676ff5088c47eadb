//! Validation and normalization of patient characteristics extracted from
//! research articles by an LLM.
//!
//! The core is `ExtractionValidator::validate`: a raw field -> value record goes
//! in, a `ValidationReport` (errors, warnings, cleaned data) comes out. The
//! remaining modules are the plumbing around it: turning completions into
//! records, merging chunk results, comparing runs, batch files and CSV.

pub mod batch;
pub mod compare;
pub mod config;
pub mod consistency;
pub mod export;
pub mod field;
pub mod merge;
pub mod normalize;
pub mod response;
pub mod schema;
pub mod validator;

pub type Result<T> = anyhow::Result<T>;

pub use config::ValidatorConfig;
pub use schema::{FieldType, SchemaEntry, SchemaRegistry};
pub use validator::{ExtractionValidator, FieldEntry, RawRecord, ValidationReport};
