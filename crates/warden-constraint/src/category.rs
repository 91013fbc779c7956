// category.rs — The closed set of action categories and possible verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of action categories a constraint profile can govern.
///
/// Closed by design: an agent action that cannot be classified into one
/// of these falls back to [`ActionCategory::Unknown`], which every
/// profile must resolve to a verdict (there is no silent pass-through).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionCategory {
    FileRead,
    FileWrite,
    FileDelete,
    ShellExec,
    NetworkRequest,
    CodeEdit,
    ToolUse,
    Unknown,
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ActionCategory::FileRead => "file_read",
            ActionCategory::FileWrite => "file_write",
            ActionCategory::FileDelete => "file_delete",
            ActionCategory::ShellExec => "shell_exec",
            ActionCategory::NetworkRequest => "network_request",
            ActionCategory::CodeEdit => "code_edit",
            ActionCategory::ToolUse => "tool_use",
            ActionCategory::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

impl ActionCategory {
    /// All categories, in a fixed, canonical order. Used when building a
    /// default (fully-populated) action policy map and when canonicalizing
    /// a profile for hashing.
    pub const ALL: [ActionCategory; 8] = [
        ActionCategory::FileRead,
        ActionCategory::FileWrite,
        ActionCategory::FileDelete,
        ActionCategory::ShellExec,
        ActionCategory::NetworkRequest,
        ActionCategory::CodeEdit,
        ActionCategory::ToolUse,
        ActionCategory::Unknown,
    ];
}

/// A governance verdict for a single action category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Allow,
    Escalate,
    Block,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Allow => "allow",
            Verdict::Escalate => "escalate",
            Verdict::Block => "block",
        };
        write!(f, "{s}")
    }
}

/// The enforcement strictness level a profile is evaluated under.
///
/// Strictness does not change *what* a profile says about a category —
/// it changes ambient enforcement behavior that is not expressible as a
/// per-category verdict (durability of writes, whether escalation without
/// a callback degrades to block). See crate-level docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Lowest assurance: best-effort durability, wide tolerance for
    /// unclassified actions.
    A,
    /// Default: flush-on-completion durability, unclassified actions
    /// resolve to the category's `Unknown` verdict.
    B,
    /// Highest assurance: per-entry flush and fsync on every audit and
    /// violation write.
    C,
}

impl Default for Strictness {
    fn default() -> Self {
        Strictness::B
    }
}
