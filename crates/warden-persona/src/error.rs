// error.rs — Error types for persona sealing and integrity verification.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersonaError {
    /// A requested capability is not in the static table for the given
    /// agent type. A structural seal failure — sealing never
    /// half-succeeds, so no persona is returned.
    #[error("capability '{capability}' is not permitted for agent type '{agent_type}'")]
    CapabilityMismatch {
        agent_type: String,
        capability: String,
    },

    /// A sealed persona's recomputed identity hash no longer matches the
    /// hash persisted at seal time — violation code V001. This is the
    /// concrete, testable stand-in for "attempted mutation of a sealed
    /// instance": Rust's type system makes the mutation itself
    /// unrepresentable, so this is the failure mode that actually occurs
    /// at runtime — a stale or tampered persisted identity.
    #[error("persona lock violation for agent '{agent_id}': identity hash mismatch")]
    LockViolation { agent_id: String },

    #[error("failed to read identity store at {path}: {source}")]
    StoreReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write identity store at {path}: {source}")]
    StoreWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}
