// error.rs — Error types for the execution proxy.

use std::path::PathBuf;

use thiserror::Error;

/// Errors the execution proxy can surface. Note what is deliberately
/// absent: there is no `Blocked` or `Escalated` variant. A governance
/// decision is data (an [`crate::audit::AuditEntry`] with
/// `Decision::Blocked`), never an `Err` — only genuine operational
/// failures (the violation tracker or the strictness-C audit sink
/// refusing to write) are errors here. Executor failures are not among
/// them either: per the failure semantics in the spec, they are captured
/// into the audit entry as a failed-but-executed action, never thrown.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("failed to record violation: {0}")]
    ViolationRecordFailed(warden_violations::ViolationError),

    /// Strictness C flushes every audit entry to disk synchronously as
    /// it is admitted; a failure to do so is an operational error, not a
    /// governance decision.
    #[error("failed to flush audit entry to {path}: {source}")]
    AuditWriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}
