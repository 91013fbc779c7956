// capability.rs — The closed agent-type enumeration and the static
// capability table sealing checks against.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of agent types a persona may be sealed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentType {
    Coding,
    Review,
    Planning,
    Analysis,
    Testing,
}

impl fmt::Display for AgentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AgentType::Coding => "coding",
            AgentType::Review => "review",
            AgentType::Planning => "planning",
            AgentType::Analysis => "analysis",
            AgentType::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

impl AgentType {
    /// The capabilities permitted for this agent type. Sealing with a
    /// capability outside this list fails — see
    /// [`crate::error::PersonaError::CapabilityMismatch`].
    pub fn allowed_capabilities(self) -> &'static [&'static str] {
        match self {
            AgentType::Coding => &["read_file", "write_file", "edit_file", "run_tests"],
            AgentType::Review => &["read_file", "comment", "approve", "reject"],
            AgentType::Planning => &["read_file", "draft_plan"],
            AgentType::Analysis => &["read_file", "run_query", "generate_report"],
            AgentType::Testing => &["read_file", "run_tests", "write_file"],
        }
    }
}
