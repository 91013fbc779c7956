// audit.rs — AuditEntry: the permanent record of one admission decision.
//
// Field order here is load-bearing: it is the on-disk field order from
// the audit log format (`timestamp, plan_id, persona_id, constraint_hash,
// action_type, target, decision, executed, error?`). Struct field
// declaration order is what `serde_json` preserves when serializing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_constraint::ActionCategory;

/// The outcome recorded against an action request. Distinct from
/// `warden_constraint::Verdict`: a `Verdict::Allow` that actually ran
/// becomes `Decision::Executed`; one that never touched the executor
/// because the proxy is in mock mode becomes `Decision::Mocked`; anything
/// that did not run at all — blocked, or escalated-and-rejected — becomes
/// `Decision::Blocked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Executed,
    Blocked,
    Mocked,
}

/// One line of the audit log: what was requested, what was decided, and
/// (if it ran) what happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub plan_id: String,
    pub persona_id: String,
    pub constraint_hash: String,
    pub action_type: ActionCategory,
    pub target: String,
    pub decision: Decision,
    pub executed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the proxy was running in `ExecutionMode::DryRun` at
    /// admission time; a dry run is otherwise audited exactly like a mock.
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
}
