// request.rs — ActionRequest: what the proxy is asked to admit.

use serde::{Deserialize, Serialize};

use warden_constraint::ActionCategory;

/// One concrete attempt to act, submitted to the proxy alongside the
/// plan's `ValidationResult`. `step_index` ties this request back to the
/// step verdict the validator already computed — the proxy never
/// re-derives a verdict, only looks one up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub plan_id: String,
    pub step_index: usize,
    pub category: ActionCategory,
    pub target: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl ActionRequest {
    pub fn new(
        plan_id: impl Into<String>,
        step_index: usize,
        category: ActionCategory,
        target: impl Into<String>,
    ) -> Self {
        Self {
            plan_id: plan_id.into(),
            step_index,
            category,
            target: target.into(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}
