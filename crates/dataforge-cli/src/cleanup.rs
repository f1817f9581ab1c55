use std::path::Path;

use tracing::{debug, warn};

use crate::error::CliResult;

/// Remove every regular `*.json` file directly inside `dir`.
///
/// Files that cannot be removed are logged and skipped. Returns the number
/// removed.
pub fn clear_json_files(dir: &Path) -> CliResult<usize> {
    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        if !is_json || !path.is_file() {
            continue;
        }
        match std::fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed file");
                removed += 1;
            }
            Err(err) => warn!(path = %path.display(), error = %err, "failed to remove file"),
        }
    }
    Ok(removed)
}
