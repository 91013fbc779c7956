// action.rs — A single extracted action intent.

use serde::{Deserialize, Serialize};
use warden_constraint::ActionCategory;

/// A structured tool invocation, when the plan step names one explicitly
/// (as opposed to being inferred from free text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

/// One action intent pulled out of a plan step: a category, the target
/// it acts on, and an optional structured tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedAction {
    pub category: ActionCategory,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
}

impl ExtractedAction {
    pub fn new(category: ActionCategory, target: impl Into<String>) -> Self {
        Self {
            category,
            target: target.into(),
            tool_call: None,
        }
    }

    pub fn with_tool_call(mut self, tool_call: ToolCall) -> Self {
        self.tool_call = Some(tool_call);
        self
    }

    /// Write-like categories are the ones the sandbox allow-list check
    /// applies to (`§4.3` verdict resolution step 2: "the action would
    /// write outside the allow list").
    pub fn is_write_like(&self) -> bool {
        matches!(
            self.category,
            ActionCategory::FileWrite | ActionCategory::FileDelete | ActionCategory::CodeEdit
        )
    }
}

/// True if `target` looks like a filesystem path or filename rather than
/// an arbitrary free-text phrase. The sandbox allow-list check only makes
/// sense against a path-like target — matching a glob like `"./src/**"`
/// against an entire command description never matches, which would
/// otherwise make every write look like a sandbox escape.
pub fn is_path_like(target: &str) -> bool {
    target.contains('/')
        || target
            .rsplit_once('.')
            .is_some_and(|(_, ext)| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}
