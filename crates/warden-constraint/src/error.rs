// error.rs — Error types for constraint profile loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving, parsing, or validating a
/// constraint profile.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// No profile file exists for the requested name in the governance
    /// directory.
    #[error("constraint profile '{name}' not found under {dir}")]
    ProfileNotFound { name: String, dir: PathBuf },

    /// The profile file exists but failed to parse, or failed schema
    /// validation (unknown field, wrong type, missing required field).
    #[error("constraint profile '{name}' failed validation: {reason}")]
    ProfileValidationError { name: String, reason: String },

    /// A `parent` chain could not be resolved: either a named parent does
    /// not exist, or the chain contains a cycle.
    #[error("inheritance error resolving '{name}': {reason}")]
    InheritanceError { name: String, reason: String },

    /// Two profiles disagree on the same action category in a way that
    /// cannot be resolved by child-overrides-parent precedence (reserved
    /// for future multi-parent inheritance; currently unused by
    /// single-parent chains, kept for forward compatibility with the
    /// validation taxonomy).
    #[error("conflicting policy for '{category}' between '{a}' and '{b}'")]
    ProfileConflictError {
        category: String,
        a: String,
        b: String,
    },

    /// Failed to read the profile file from disk.
    #[error("failed to read profile file at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}
