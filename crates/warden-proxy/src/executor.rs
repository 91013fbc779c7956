// executor.rs — The injection seams for REAL dispatch and human approval.
//
// Both are plain traits rather than closures so callers can hold state
// (a connection, a channel handle) across calls — the same shape the
// teacher uses for its tool-call dispatch seams.

use crate::request::ActionRequest;

/// Performs the real side effect for an admitted action. Implementations
/// live outside this crate entirely — the kernel never knows what a
/// "shell exec" or "file write" actually does, only that it was allowed.
pub trait Executor: Send + Sync {
    /// Run `request` to completion and return its output, or an error
    /// string that is recorded in the audit entry (never as a violation —
    /// see `ProxyError` docs).
    fn execute(&self, request: &ActionRequest) -> Result<serde_json::Value, String>;
}

/// Synchronously asks a human (or an automated policy) whether an
/// escalated action should proceed.
pub trait ApprovalCallback: Send + Sync {
    /// `rationale` is the validator's free-text reason the step escalated.
    /// Returning `false` degrades the action to blocked with V006.
    fn approve(&self, request: &ActionRequest, rationale: &str) -> bool;
}

/// An executor that performs no side effects and returns a fixed "would
/// execute" record. The proxy never calls any executor at all in
/// `ExecutionMode::Mock`/`DryRun` (it synthesizes that record itself), so
/// this is purely a convenient `ExecutionMode::Real` stand-in for tests
/// and demos that have no real side effect to perform.
pub struct NullExecutor;

impl Executor for NullExecutor {
    fn execute(&self, request: &ActionRequest) -> Result<serde_json::Value, String> {
        Ok(serde_json::json!({
            "mocked": true,
            "category": request.category.to_string(),
            "target": request.target,
        }))
    }
}

/// An approval callback that always rejects — exercises the same
/// degrade-to-block path as an absent callback.
pub struct AlwaysReject;

impl ApprovalCallback for AlwaysReject {
    fn approve(&self, _request: &ActionRequest, _rationale: &str) -> bool {
        false
    }
}
