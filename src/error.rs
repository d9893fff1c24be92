use std::path::{Path, PathBuf};

use thiserror::Error;

/// Every failure the pipeline can surface to the caller.
///
/// Each variant maps onto a process exit code so the binary can signal what
/// went wrong without the caller parsing messages.
#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to read quotes CSV '{}': {message}", path.display())]
    DataSource { path: PathBuf, message: String },

    #[error("Line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Insufficient data: {0}")]
    DegenerateInput(String),

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Failed to write '{}': {message}", path.display())]
    Write { path: PathBuf, message: String },
}

impl AppError {
    pub fn data_source(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::DataSource {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateInput(message.into())
    }

    pub fn write(path: &Path, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) | AppError::DataSource { .. } | AppError::Parse { .. } => 2,
            AppError::DegenerateInput(_) => 3,
            AppError::Render(_) | AppError::Write { .. } => 4,
        }
    }
}
