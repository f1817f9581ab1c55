//! Core contracts for DataForge.
//!
//! This crate owns the field grammar: it turns raw `"type:value"` spec
//! strings into typed, immutable descriptors and loads schemas from JSON
//! text or files. Nothing here generates values or touches the output.

pub mod error;
pub mod grammar;
pub mod source;
pub mod types;

pub use error::{Error, Result};
pub use grammar::{
    ParsedSchema, SchemaWarning, parse_field, parse_schema, parse_schema_str, parse_spec,
};
pub use source::{is_schema_file, load_schema, load_schema_file};
pub use types::{FieldDescriptor, FieldType, IntRange, IntSpec, StrSpec, Strategy, ValueSet};

/// Schema used when neither the config file nor the command line provides one.
pub const DEFAULT_SCHEMA: &str = r#"{"id": "int:rand", "timestamp": "timestamp:", "value": "str:rand"}"#;

/// Lower bound of the span used by `int:rand`.
pub const INT_RAND_MIN: i64 = 0;

/// Upper bound (inclusive) of the span used by `int:rand`.
pub const INT_RAND_MAX: i64 = 999_999;
