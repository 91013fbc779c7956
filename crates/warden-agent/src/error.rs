// error.rs — Error types for the agent facade.

use std::path::PathBuf;
use thiserror::Error;

/// Structural failures the facade can surface. Per the kernel's
/// propagation policy, only these — never a BLOCK or ESCALATE verdict —
/// travel as `Err`; governance decisions remain data on
/// [`crate::facade::TaskExecution`].
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("failed to seal persona: {0}")]
    PersonaSeal(#[from] warden_persona::PersonaError),

    #[error("failed to load constraint profile: {0}")]
    ConstraintLoad(#[from] warden_constraint::ConstraintError),

    #[error("failed to open violation tracker: {0}")]
    ViolationTracker(#[from] warden_violations::ViolationError),

    #[error("action execution failed: {0}")]
    Proxy(#[from] warden_proxy::ProxyError),

    #[error("failed to read config file at {path}: {source}")]
    ConfigReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    ConfigParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
}
