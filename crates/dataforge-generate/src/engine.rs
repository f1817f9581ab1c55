use std::any::Any;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use serde_json::Value;
use tracing::{debug, info, warn};

use dataforge_core::{ParsedSchema, parse_schema};

use crate::distribute::{WorkerAssignment, assign_ranges, distribute};
use crate::errors::GenerationError;
use crate::generators::{RecordGenerator, seeded_rng};
use crate::model::{FileReport, GenerateOptions, GenerationReport};
use crate::output::jsonl::{EmitStats, write_jsonl_file, write_records};

/// Entry point for console and file generation.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// True when the request is worth spreading over several workers.
    pub fn should_parallelize(&self) -> bool {
        self.options.files_count > 1 && self.options.workers > 1
    }

    /// Write `lines_per_file` records to `writer` as line-delimited JSON.
    pub fn write_console<W: Write>(
        &self,
        schema: &ParsedSchema,
        writer: W,
    ) -> Result<EmitStats, GenerationError> {
        let run_seed = self.run_seed();
        let mut generator = RecordGenerator::new(schema, seeded_rng(run_seed, "console"));
        debug!(run_seed, lines = self.options.lines_per_file, "console generation started");
        write_records(writer, generator.records(self.options.lines_per_file))
    }

    /// Create every requested file on the calling thread.
    pub fn generate_files(&self, schema: &ParsedSchema) -> Result<GenerationReport, GenerationError> {
        self.check_out_dir()?;
        let start = Instant::now();
        let run_seed = self.run_seed();
        let assignment = WorkerAssignment {
            worker_id: 1,
            start_index: 1,
            count: self.options.files_count,
        };

        info!(
            files = self.options.files_count,
            lines_per_file = self.options.lines_per_file,
            run_seed,
            "file generation started"
        );

        let mut report = GenerationReport::new(run_seed, 1);
        for file in write_assignment(&assignment, schema, &self.options, run_seed)? {
            report.record_file(file);
        }
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            files = report.files.len(),
            lines = report.lines_written,
            bytes = report.bytes_written,
            duration_ms = report.duration_ms,
            "file generation completed"
        );
        Ok(report)
    }

    /// Create every requested file using up to `workers` blocking tasks.
    ///
    /// Each worker reparses `raw_schema` and owns its random sources. Results
    /// are concatenated in worker order. When a worker fails the remaining
    /// workers still run to completion and the first failure is returned;
    /// files already written stay on disk.
    pub async fn generate_files_parallel(
        &self,
        raw_schema: &Value,
    ) -> Result<GenerationReport, GenerationError> {
        parse_schema(raw_schema)?;
        self.check_out_dir()?;

        let start = Instant::now();
        let run_seed = self.run_seed();
        let distribution = distribute(self.options.files_count, self.options.workers);
        let assignments: Vec<WorkerAssignment> = assign_ranges(&distribution)
            .into_iter()
            .filter(|assignment| assignment.count > 0)
            .collect();

        info!(
            files = self.options.files_count,
            workers = assignments.len(),
            distribution = ?distribution,
            run_seed,
            "parallel file generation started"
        );

        let raw_schema = Arc::new(raw_schema.clone());
        let options = Arc::new(self.options.clone());
        let mut handles = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let raw_schema = Arc::clone(&raw_schema);
            let options = Arc::clone(&options);
            let handle = tokio::task::spawn_blocking(
                move || -> Result<Vec<FileReport>, GenerationError> {
                    let schema = parse_schema(&raw_schema)?;
                    write_assignment(&assignment, &schema, &options, run_seed)
                },
            );
            handles.push((assignment.worker_id, handle));
        }

        let mut report = GenerationReport::new(run_seed, handles.len());
        let mut first_error = None;
        for (worker, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(err) if err.is_panic() => Err(GenerationError::WorkerFailed {
                    worker,
                    message: panic_message(err.into_panic()),
                }),
                Err(err) => Err(GenerationError::WorkerFailed {
                    worker,
                    message: err.to_string(),
                }),
            };
            match outcome {
                Ok(files) => files.into_iter().for_each(|file| report.record_file(file)),
                Err(err) => {
                    warn!(worker, error = %err, "worker failed");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        if let Some(err) = first_error {
            return Err(err);
        }

        info!(
            files = report.files.len(),
            workers = report.workers,
            lines = report.lines_written,
            bytes = report.bytes_written,
            duration_ms = report.duration_ms,
            "parallel file generation completed"
        );
        Ok(report)
    }

    fn run_seed(&self) -> u64 {
        self.options.seed.unwrap_or_else(|| rand::rng().random())
    }

    fn check_out_dir(&self) -> Result<(), GenerationError> {
        let out_dir = &self.options.out_dir;
        if !out_dir.is_dir() {
            return Err(GenerationError::InvalidRequest(format!(
                "output path does not exist or is not a directory: {}",
                out_dir.display()
            )));
        }
        Ok(())
    }
}

fn write_assignment(
    assignment: &WorkerAssignment,
    schema: &ParsedSchema,
    options: &GenerateOptions,
    run_seed: u64,
) -> Result<Vec<FileReport>, GenerationError> {
    let mut files = Vec::new();
    for index in assignment.indices() {
        let mut generator = RecordGenerator::new(schema, seeded_rng(run_seed, &file_key(index)));
        let name = options
            .prefix
            .file_name(&options.file_name, index, generator.rng_mut());
        let path = options.out_dir.join(name);
        let stats = write_jsonl_file(&path, generator.records(options.lines_per_file))?;

        debug!(
            worker = assignment.worker_id,
            index,
            path = %path.display(),
            lines = stats.lines,
            "file written"
        );
        files.push(FileReport {
            index,
            path,
            lines: stats.lines,
            bytes: stats.bytes,
        });
    }
    Ok(files)
}

fn file_key(index: u64) -> String {
    format!("file-{index}")
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic during generation".to_string()
    }
}
