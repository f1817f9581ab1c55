//! Value generation and output engine for DataForge.
//!
//! This crate consumes parsed schemas from `dataforge-core` and produces
//! line-delimited JSON, either to a writer (console) or to numbered files,
//! optionally fanning file creation out over several workers.

pub mod distribute;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
pub mod naming;
pub mod output;

pub use distribute::{WorkerAssignment, assign_ranges, distribute};
pub use engine::GenerationEngine;
pub use errors::GenerationError;
pub use generators::{GeneratedValue, Record, RecordGenerator, generate_value};
pub use model::{FileReport, GenerateOptions, GenerationReport};
pub use naming::FilePrefix;
pub use output::jsonl::{EmitStats, write_jsonl_file, write_record, write_records};
