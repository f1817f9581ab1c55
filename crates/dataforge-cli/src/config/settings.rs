use std::path::Path;

use dataforge_core::DEFAULT_SCHEMA;
use serde::{Deserialize, Serialize};

use super::ConfigResult;
use super::atomic::write_bytes_atomic;

pub const DEFAULT_CONFIG_PATH: &str = "dataforge.toml";

const CONFIG_HEADER: &str = "# dataforge defaults. Command-line flags override every key.\n\n";

/// Defaults applied before command-line overrides.
///
/// Counts are signed so out-of-range values reach parameter validation
/// instead of failing the whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub files_count: i64,
    pub file_name: String,
    pub file_prefix: String,
    pub data_lines: i64,
    pub multiprocessing: i64,
    pub data_schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            files_count: 10,
            file_name: "generated_data".to_string(),
            file_prefix: "count".to_string(),
            data_lines: 1000,
            multiprocessing: 1,
            data_schema: DEFAULT_SCHEMA.to_string(),
            seed: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    /// Problems found while loading. Reported once logging is up.
    pub warnings: Vec<String>,
}

/// Read settings from `path`, falling back to defaults when the file is
/// missing or malformed. Never fails.
pub fn load_settings(path: &Path) -> LoadedSettings {
    let fallback = |warning: String| LoadedSettings {
        settings: Settings::default(),
        warnings: vec![warning],
    };

    if !path.exists() {
        return fallback(format!(
            "config file {} not found, using defaults",
            path.display()
        ));
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            return fallback(format!(
                "failed to read config file {}: {err}, using defaults",
                path.display()
            ));
        }
    };

    match toml::from_str::<Settings>(&content) {
        Ok(settings) => LoadedSettings {
            settings,
            warnings: Vec::new(),
        },
        Err(err) => fallback(format!(
            "malformed config file {}: {err}, using defaults",
            path.display()
        )),
    }
}

/// Write the default settings to `path` unless a file is already there.
/// Returns whether a file was written.
pub fn write_default_settings(path: &Path) -> ConfigResult<bool> {
    if path.exists() {
        return Ok(false);
    }
    let mut encoded = CONFIG_HEADER.to_string();
    encoded.push_str(&toml::to_string_pretty(&Settings::default())?);
    write_bytes_atomic(path, encoded.as_bytes())?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_config(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dataforge_{label}_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir.join(DEFAULT_CONFIG_PATH)
    }

    #[test]
    fn missing_file_yields_defaults_and_a_warning() {
        let loaded = load_settings(&temp_config("missing"));
        assert_eq!(loaded.settings, Settings::default());
        assert_eq!(loaded.warnings.len(), 1);
        assert!(loaded.warnings[0].contains("not found"));
    }

    #[test]
    fn partial_file_keeps_defaults_for_absent_keys() {
        let path = temp_config("partial");
        std::fs::write(&path, "files_count = 3\nfile_prefix = \"uuid\"\nseed = 9\n")
            .expect("write config");

        let loaded = load_settings(&path);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.settings.files_count, 3);
        assert_eq!(loaded.settings.file_prefix, "uuid");
        assert_eq!(loaded.settings.seed, Some(9));
        assert_eq!(loaded.settings.data_lines, 1000);
        assert_eq!(loaded.settings.data_schema, DEFAULT_SCHEMA);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let path = temp_config("malformed");
        std::fs::write(&path, "files_count = \"many\"\n").expect("write config");

        let loaded = load_settings(&path);
        assert_eq!(loaded.settings, Settings::default());
        assert!(loaded.warnings[0].contains("malformed"));
    }

    #[test]
    fn default_file_round_trips_and_is_never_overwritten() {
        let path = temp_config("write_default");
        assert!(write_default_settings(&path).expect("first write"));
        assert!(!write_default_settings(&path).expect("second write"));

        let loaded = load_settings(&path);
        assert!(loaded.warnings.is_empty());
        assert_eq!(loaded.settings, Settings::default());
    }
}
