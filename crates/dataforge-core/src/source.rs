use std::path::Path;

use serde_json::Value;

use crate::error::{Error, Result};

/// Returns true when `input` looks like a path and names an existing file.
///
/// Inputs without a `.json` suffix or a path separator are always treated as
/// inline JSON, so `{"id": "int:rand"}` is never probed on disk.
pub fn is_schema_file(input: &str) -> bool {
    let looks_like_path = input.ends_with(".json") || input.contains('/') || input.contains('\\');
    looks_like_path && Path::new(input).is_file()
}

/// Read and decode a schema file.
pub fn load_schema_file(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load a schema given either inline JSON text or a path to a JSON file.
///
/// Only decoding happens here; shape checks live in [`crate::parse_schema`].
pub fn load_schema(input: &str) -> Result<Value> {
    if is_schema_file(input) {
        return load_schema_file(Path::new(input));
    }
    Ok(serde_json::from_str(input)?)
}
