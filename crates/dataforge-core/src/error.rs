use std::path::PathBuf;

use thiserror::Error;

/// Schema errors raised while loading or parsing a data schema.
///
/// Every field-level variant names the offending field so the diagnostic can
/// be shown to the user as-is.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema document is not a JSON object.
    #[error("schema must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
    /// The schema has no fields.
    #[error("schema cannot be empty")]
    EmptySchema,
    /// The schema text is not valid JSON.
    #[error("invalid JSON in schema: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The schema file could not be read.
    #[error("cannot read schema file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A field name is empty.
    #[error("field names cannot be empty")]
    EmptyFieldName,
    /// A field definition is not a string.
    #[error("field '{field}': definition must be a string, got {found}")]
    FieldNotString { field: String, found: &'static str },
    #[error("field '{field}': definition must be in format 'type:value', got '{definition}'")]
    MissingColon { field: String, definition: String },
    #[error("field '{field}': invalid type '{type_name}', expected one of timestamp, str, int")]
    UnknownType { field: String, type_name: String },
    #[error("field '{field}': int type requires a value")]
    MissingIntValue { field: String },
    #[error("field '{field}': range minimum ({min}) must be less than maximum ({max})")]
    InvalidRange { field: String, min: i64, max: i64 },
    #[error("field '{field}': invalid integer value '{value}'")]
    InvalidInteger { field: String, value: String },
    #[error("field '{field}': list contains non-integer value '{value}'")]
    NonIntegerInSet { field: String, value: String },
    #[error("field '{field}': list cannot be empty")]
    EmptySet { field: String },
}

impl Error {
    /// Field the error refers to, when it is field-specific.
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::FieldNotString { field, .. }
            | Error::MissingColon { field, .. }
            | Error::UnknownType { field, .. }
            | Error::MissingIntValue { field }
            | Error::InvalidRange { field, .. }
            | Error::InvalidInteger { field, .. }
            | Error::NonIntegerInSet { field, .. }
            | Error::EmptySet { field } => Some(field.as_str()),
            _ => None,
        }
    }
}

/// Convenience alias for results returned by the schema layer.
pub type Result<T> = std::result::Result<T, Error>;
