use dataforge_generate::GenerationError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid parameter: {0}")]
    InvalidParam(String),
    #[error("schema error: {0}")]
    Schema(#[from] dataforge_core::Error),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

pub type CliResult<T> = Result<T, CliError>;
