// error.rs — Error types for the violation tracker.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViolationError {
    #[error("failed to open violation log at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to append violation record: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("failed to serialize violation record: {0}")]
    SerializationError(#[from] serde_json::Error),
}
