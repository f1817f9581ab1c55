use std::fs::{OpenOptions, create_dir_all};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{ConfigError, ConfigResult};

/// Write `data` through a sibling temp file and rename it into place.
pub fn write_bytes_atomic(path: &Path, data: &[u8]) -> ConfigResult<()> {
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        create_dir_all(parent)?;
    }

    let tmp_path = temp_path(path)?;
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    if let Some(parent) = parent {
        sync_dir(parent)?;
    }

    Ok(())
}

fn temp_path(path: &Path) -> ConfigResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| ConfigError::Invalid(format!("not a file path: {}", path.display())))?;
    let tmp_name = format!(".{}.{}.tmp", file_name.to_string_lossy(), uuid::Uuid::new_v4());
    Ok(path.with_file_name(tmp_name))
}

fn sync_dir(path: &Path) -> io::Result<()> {
    let dir = OpenOptions::new().read(true).open(path)?;
    dir.sync_all()
}
