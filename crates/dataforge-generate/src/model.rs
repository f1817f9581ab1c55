use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::naming::FilePrefix;

/// Options for file generation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Directory where files are written. Must already exist.
    pub out_dir: PathBuf,
    /// Base name placed after the prefix.
    pub file_name: String,
    pub prefix: FilePrefix,
    /// Number of files to create.
    pub files_count: u64,
    /// Records per file (and records for console output).
    pub lines_per_file: u64,
    /// Worker count for parallel file creation.
    pub workers: usize,
    /// Run seed; drawn at random when absent.
    pub seed: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("."),
            file_name: "generated_data".to_string(),
            prefix: FilePrefix::Count,
            files_count: 10,
            lines_per_file: 1000,
            workers: 1,
            seed: None,
        }
    }
}

/// Summary of one written file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileReport {
    pub index: u64,
    pub path: PathBuf,
    pub lines: u64,
    pub bytes: u64,
}

/// Report for a file generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_seed: u64,
    pub workers: usize,
    pub files: Vec<FileReport>,
    pub lines_written: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_seed: u64, workers: usize) -> Self {
        Self {
            run_seed,
            workers,
            files: Vec::new(),
            lines_written: 0,
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_file(&mut self, file: FileReport) {
        self.lines_written += file.lines;
        self.bytes_written += file.bytes;
        self.files.push(file);
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter().map(|file| &file.path)
    }
}
