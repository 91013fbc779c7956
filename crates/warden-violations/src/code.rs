// code.rs — The stable violation code vocabulary.
//
// These six codes are an external contract: downstream tooling may key
// behavior off them. New codes are appended, never renumbered; codes are
// never reused for a different meaning even if retired.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationCode {
    /// Persona lock violation — a sealed persona's recomputed identity
    /// hash no longer matches what was persisted at seal time.
    V001,
    /// Denied target — the action's target matched a deny-list pattern.
    V002,
    /// Sandbox escape — a write-like action targeted something outside
    /// the allow-list sandbox root.
    V003,
    /// Bypass attempt — the plan or a step matched a bypass indicator.
    V004,
    /// Policy block — the action's category resolved to BLOCK in the
    /// merged profile.
    V005,
    /// Unapproved action — the proxy received an action the validator
    /// never approved (including an escalation rejected or left
    /// unanswered).
    V006,
}

impl ViolationCode {
    pub const fn description(self) -> &'static str {
        match self {
            ViolationCode::V001 => "Persona lock violation",
            ViolationCode::V002 => "Denied target",
            ViolationCode::V003 => "Sandbox escape",
            ViolationCode::V004 => "Bypass attempt",
            ViolationCode::V005 => "Policy block",
            ViolationCode::V006 => "Unapproved action",
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ViolationCode::V001 => "V001",
            ViolationCode::V002 => "V002",
            ViolationCode::V003 => "V003",
            ViolationCode::V004 => "V004",
            ViolationCode::V005 => "V005",
            ViolationCode::V006 => "V006",
        };
        write!(f, "{s}")
    }
}
