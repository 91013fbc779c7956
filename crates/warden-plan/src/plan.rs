// plan.rs — Plan and PlanStep: the validator's input.

use serde::{Deserialize, Serialize};

use crate::action::ExtractedAction;

/// One step of a plan: a human-readable description plus the action
/// intent extracted from it (or supplied directly, for structured
/// plans).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStep {
    pub description: String,
    pub action: ExtractedAction,
}

/// An immutable, ordered sequence of steps submitted for validation.
/// There is deliberately no API to push a step onto a `Plan` after
/// construction — a plan is built whole, then validated, then (if
/// approved) executed step by step by the proxy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub plan_id: String,
    pub task: String,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(plan_id: impl Into<String>, task: impl Into<String>, steps: Vec<PlanStep>) -> Self {
        Self {
            plan_id: plan_id.into(),
            task: task.into(),
            steps,
        }
    }
}
