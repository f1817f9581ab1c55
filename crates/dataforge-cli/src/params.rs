use std::path::{Path, PathBuf};
use std::str::FromStr;

use dataforge_generate::{FilePrefix, GenerateOptions};
use tracing::warn;

use crate::config::Settings;
use crate::error::{CliError, CliResult};

const FORBIDDEN_NAME_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub files_count: Option<i64>,
    pub file_name: Option<String>,
    pub file_prefix: Option<FilePrefix>,
    pub data_schema: Option<String>,
    pub data_lines: Option<i64>,
    pub multiprocessing: Option<i64>,
    pub seed: Option<u64>,
    pub clear_path: bool,
}

/// Fully validated run parameters.
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Absolute output directory. `None` in console mode.
    pub out_dir: Option<PathBuf>,
    pub files_count: u64,
    pub file_name: String,
    pub file_prefix: FilePrefix,
    pub data_lines: u64,
    pub workers: usize,
    pub clear_path: bool,
    pub seed: Option<u64>,
    pub data_schema: String,
}

impl RunParams {
    pub fn console_mode(&self) -> bool {
        self.files_count == 0
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            out_dir: self.out_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            file_name: self.file_name.clone(),
            prefix: self.file_prefix,
            files_count: self.files_count,
            lines_per_file: self.data_lines,
            workers: self.workers,
            seed: self.seed,
        }
    }
}

/// Merge command-line values over `settings` and validate the result.
///
/// `available_cpus` caps the worker count.
pub fn resolve(
    path: Option<&Path>,
    settings: &Settings,
    overrides: Overrides,
    available_cpus: usize,
) -> CliResult<RunParams> {
    let files_count = overrides.files_count.unwrap_or(settings.files_count);
    let files_count = u64::try_from(files_count).map_err(|_| {
        CliError::InvalidParam(format!("files_count must be >= 0, got: {files_count}"))
    })?;

    let out_dir = if files_count > 0 {
        let path = path.ok_or_else(|| {
            CliError::InvalidParam("an output path is required when files_count > 0".to_string())
        })?;
        Some(validate_out_dir(path)?)
    } else {
        None
    };

    let file_name = overrides
        .file_name
        .unwrap_or_else(|| settings.file_name.clone());
    validate_file_name(&file_name)?;

    let file_prefix = match overrides.file_prefix {
        Some(prefix) => prefix,
        None => FilePrefix::from_str(&settings.file_prefix).map_err(CliError::InvalidParam)?,
    };

    let data_lines = overrides.data_lines.unwrap_or(settings.data_lines);
    let data_lines = u64::try_from(data_lines)
        .ok()
        .filter(|lines| *lines > 0)
        .ok_or_else(|| {
            CliError::InvalidParam(format!("data_lines must be > 0, got: {data_lines}"))
        })?;

    let requested = overrides.multiprocessing.unwrap_or(settings.multiprocessing);
    let workers = cap_workers(requested, available_cpus)?;

    Ok(RunParams {
        out_dir,
        files_count,
        file_name,
        file_prefix,
        data_lines,
        workers,
        clear_path: overrides.clear_path,
        seed: overrides.seed.or(settings.seed),
        data_schema: overrides
            .data_schema
            .unwrap_or_else(|| settings.data_schema.clone()),
    })
}

/// Expand a leading `~`, absolutize, and require an existing directory.
pub fn validate_out_dir(path: &Path) -> CliResult<PathBuf> {
    let expanded = expand_home(path);
    let absolute = std::path::absolute(&expanded)?;
    if !absolute.exists() {
        return Err(CliError::InvalidParam(format!(
            "path does not exist: {}",
            absolute.display()
        )));
    }
    if !absolute.is_dir() {
        return Err(CliError::InvalidParam(format!(
            "path is not a directory: {}",
            absolute.display()
        )));
    }
    Ok(absolute)
}

pub fn validate_file_name(name: &str) -> CliResult<()> {
    if name.trim().is_empty() {
        return Err(CliError::InvalidParam("file_name cannot be empty".to_string()));
    }
    if let Some(found) = name.chars().find(|ch| FORBIDDEN_NAME_CHARS.contains(ch)) {
        return Err(CliError::InvalidParam(format!(
            "file_name contains invalid character '{found}'"
        )));
    }
    Ok(())
}

/// Clamp the requested worker count to `available_cpus`, warning when it
/// is reduced.
pub fn cap_workers(requested: i64, available_cpus: usize) -> CliResult<usize> {
    if requested < 1 {
        return Err(CliError::InvalidParam(format!(
            "multiprocessing must be >= 1, got: {requested}"
        )));
    }
    let available = available_cpus.max(1);
    let requested = usize::try_from(requested).unwrap_or(usize::MAX);
    if requested > available {
        warn!(
            requested,
            available, "multiprocessing exceeds available cpus, capping"
        );
        return Ok(available);
    }
    Ok(requested)
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dataforge_{label}_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn invalid_param(result: CliResult<RunParams>) -> String {
        match result {
            Err(CliError::InvalidParam(message)) => message,
            other => panic!("expected invalid parameter, got {other:?}"),
        }
    }

    #[test]
    fn command_line_values_override_settings() {
        let dir = temp_dir("override");
        let settings = Settings::default();
        let overrides = Overrides {
            files_count: Some(2),
            file_name: Some("users".to_string()),
            file_prefix: Some(FilePrefix::Uuid),
            data_lines: Some(5),
            multiprocessing: Some(2),
            seed: Some(7),
            clear_path: true,
            ..Overrides::default()
        };

        let params = resolve(Some(&dir), &settings, overrides, 8).expect("resolve");
        assert_eq!(params.files_count, 2);
        assert_eq!(params.file_name, "users");
        assert_eq!(params.file_prefix, FilePrefix::Uuid);
        assert_eq!(params.data_lines, 5);
        assert_eq!(params.workers, 2);
        assert_eq!(params.seed, Some(7));
        assert!(params.clear_path);
        assert_eq!(params.data_schema, settings.data_schema);
        assert!(params.out_dir.expect("out dir").is_absolute());
    }

    #[test]
    fn settings_fill_in_missing_values() {
        let dir = temp_dir("settings");
        let settings = Settings {
            files_count: 4,
            file_prefix: "random".to_string(),
            seed: Some(3),
            ..Settings::default()
        };

        let params = resolve(Some(&dir), &settings, Overrides::default(), 8).expect("resolve");
        assert_eq!(params.files_count, 4);
        assert_eq!(params.file_prefix, FilePrefix::Random);
        assert_eq!(params.data_lines, 1000);
        assert_eq!(params.workers, 1);
        assert_eq!(params.seed, Some(3));
    }

    #[test]
    fn console_mode_ignores_the_path() {
        let overrides = Overrides {
            files_count: Some(0),
            ..Overrides::default()
        };
        let params = resolve(
            Some(Path::new("/definitely/not/here")),
            &Settings::default(),
            overrides,
            4,
        )
        .expect("resolve");
        assert!(params.console_mode());
        assert!(params.out_dir.is_none());
    }

    #[test]
    fn file_mode_requires_an_existing_directory() {
        let missing = temp_dir("missing_parent").join("nope");
        let message = invalid_param(resolve(
            Some(&missing),
            &Settings::default(),
            Overrides::default(),
            4,
        ));
        assert!(message.contains("does not exist"), "{message}");

        let file = temp_dir("file_target").join("plain.txt");
        std::fs::write(&file, "x").expect("write file");
        let message = invalid_param(resolve(
            Some(&file),
            &Settings::default(),
            Overrides::default(),
            4,
        ));
        assert!(message.contains("not a directory"), "{message}");

        let message = invalid_param(resolve(None, &Settings::default(), Overrides::default(), 4));
        assert!(message.contains("output path"), "{message}");
    }

    #[test]
    fn counts_are_range_checked() {
        let dir = temp_dir("counts");
        let with = |overrides: Overrides| resolve(Some(&dir), &Settings::default(), overrides, 4);

        let message = invalid_param(with(Overrides {
            files_count: Some(-1),
            ..Overrides::default()
        }));
        assert_eq!(message, "files_count must be >= 0, got: -1");

        let message = invalid_param(with(Overrides {
            data_lines: Some(0),
            ..Overrides::default()
        }));
        assert_eq!(message, "data_lines must be > 0, got: 0");

        let message = invalid_param(with(Overrides {
            multiprocessing: Some(0),
            ..Overrides::default()
        }));
        assert_eq!(message, "multiprocessing must be >= 1, got: 0");
    }

    #[test]
    fn unknown_configured_prefix_is_rejected() {
        let dir = temp_dir("prefix");
        let settings = Settings {
            file_prefix: "hash".to_string(),
            ..Settings::default()
        };
        let message = invalid_param(resolve(Some(&dir), &settings, Overrides::default(), 4));
        assert!(message.contains("count, random, uuid"), "{message}");
    }

    #[test]
    fn file_names_reject_path_characters() {
        assert!(validate_file_name("users_2024").is_ok());
        assert!(validate_file_name("  ").is_err());
        for bad in ["a/b", "a\\b", "a:b", "a*b", "a?b", "a\"b", "a<b", "a>b", "a|b"] {
            assert!(validate_file_name(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn workers_are_capped_to_available_cpus() {
        assert_eq!(cap_workers(16, 4).expect("cap"), 4);
        assert_eq!(cap_workers(3, 4).expect("cap"), 3);
        assert_eq!(cap_workers(2, 0).expect("cap"), 1);
        assert!(cap_workers(-2, 4).is_err());
    }

    #[test]
    fn home_prefix_is_expanded() {
        let Some(home) = std::env::var_os("HOME") else {
            return;
        };
        assert_eq!(
            expand_home(Path::new("~/out")),
            PathBuf::from(home).join("out")
        );
        assert_eq!(expand_home(Path::new("/tmp/out")), PathBuf::from("/tmp/out"));
    }
}
