use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("schema error: {0}")]
    Schema(#[from] dataforge_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("worker {worker} failed: {message}")]
    WorkerFailed { worker: usize, message: String },
}
