//! Schema layer: the fields an extraction is validated against.
//!
//! It owns:
//! - FieldType (declared type tag of a field)
//! - SchemaRegistry (canonical name -> entry), built once and shared read-only

pub mod field_type;
pub mod registry;

pub use field_type::FieldType;
pub use registry::{SchemaEntry, SchemaRegistry};
