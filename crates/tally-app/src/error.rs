use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by app tooling operations.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("manifest not found at {0}")]
    ManifestNotFound(PathBuf),

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("app directory already exists: {0}")]
    DirectoryExists(PathBuf),

    #[error("source file is not valid UTF-8: {0}")]
    NonUtf8Source(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
