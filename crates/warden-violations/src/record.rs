// record.rs — A single persisted violation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::code::ViolationCode;

/// One governance breach, ready to be appended to the violation log.
/// Field order here is the field order the JSONL serialization emits,
/// which is the fixed order the on-disk contract names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViolationRecord {
    pub timestamp: DateTime<Utc>,
    pub code: ViolationCode,
    pub description: String,
    pub plan_id: String,
    pub persona_id: String,
    pub constraint_hash: String,
}

impl ViolationRecord {
    pub fn new(
        code: ViolationCode,
        plan_id: impl Into<String>,
        persona_id: impl Into<String>,
        constraint_hash: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            code,
            description: code.description().to_string(),
            plan_id: plan_id.into(),
            persona_id: persona_id.into(),
            constraint_hash: constraint_hash.into(),
        }
    }

    /// Same as [`ViolationRecord::new`] but with a caller-supplied
    /// description overriding the code's default — used when the
    /// violating match (e.g. the specific deny-list pattern, or bypass
    /// phrase) is useful context beyond the generic code description.
    pub fn with_description(
        code: ViolationCode,
        description: impl Into<String>,
        plan_id: impl Into<String>,
        persona_id: impl Into<String>,
        constraint_hash: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            code,
            description: description.into(),
            plan_id: plan_id.into(),
            persona_id: persona_id.into(),
            constraint_hash: constraint_hash.into(),
        }
    }
}
