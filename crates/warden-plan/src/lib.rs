//! Turns a task (free text or a pre-structured plan) into a verdict per
//! step and for the plan as a whole, against a loaded constraint profile.
//!
//! ```
//! use warden_constraint::{ActionCategory, ConstraintProfile, LoadedProfile, Verdict};
//! use warden_plan::PlanValidator;
//! use std::collections::BTreeMap;
//!
//! let mut map = BTreeMap::new();
//! map.insert(ActionCategory::FileRead, Verdict::Allow);
//! let profile = ConstraintProfile {
//!     name: "demo".to_string(),
//!     parent: None,
//!     strictness: None,
//!     action_policy_map: map,
//!     deny_list: vec![],
//!     allow_list: vec![],
//!     bypass_indicators: vec![],
//! };
//! let hash = warden_constraint::hash_profile(&profile);
//! let loaded = LoadedProfile { profile, constraint_hash: hash };
//!
//! let result = PlanValidator::validate_task("plan-1", "read file main.rs", &loaded);
//! assert!(matches!(result.outcome, warden_plan::ValidationOutcome::Approved));
//! ```

mod action;
mod extractor;
mod plan;
mod validator;

pub use action::{is_path_like, ExtractedAction, ToolCall};
pub use extractor::{classify_step, split_into_steps};
pub use plan::{Plan, PlanStep};
pub use validator::{
    PlanValidator, PredictedViolation, StepTrace, StepVerdict, ValidationOutcome, ValidationResult,
};
