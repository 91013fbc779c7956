//! # warden-proxy
//!
//! The single gate through which every admitted action passes. Consumes
//! a plan's [`warden_plan::ValidationResult`] and a sealed persona,
//! re-checks persona integrity, looks up the per-step verdict, and
//! either dispatches to an injected [`Executor`], mocks the dispatch, or
//! rejects with a recorded violation. Every admission decision — allowed
//! or not — becomes an [`AuditEntry`] bound to the `constraint_hash` of
//! the profile active at admission time.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use warden_constraint::{ActionCategory, ConstraintProfile, LoadedProfile, Verdict};
//! use warden_persona::{AgentType, PersonaLock};
//! use warden_plan::PlanValidator;
//! use warden_proxy::{ActionRequest, ExecutionMode, ExecutionProxy, NullExecutor};
//! use warden_violations::ViolationTracker;
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
//! let persona = PersonaLock::seal("demo-001", AgentType::Coding, Vec::new())?;
//! let tracker = ViolationTracker::new(tempfile::tempdir()?.path())?;
//! let mut proxy = ExecutionProxy::new(
//!     &persona,
//!     &loaded,
//!     ExecutionMode::Mock,
//!     Box::new(NullExecutor),
//!     None,
//!     &tracker,
//! );
//!
//! let validation = PlanValidator::validate_task("plan-1", "read file main.rs", &loaded);
//! let request = ActionRequest::new("plan-1", 0, ActionCategory::FileRead, "main.rs");
//! let result = proxy.execute(&request, &validation)?;
//! assert_eq!(result.decision, warden_proxy::Decision::Mocked);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod audit;
mod error;
mod executor;
mod proxy;
mod request;

pub use audit::{AuditEntry, Decision};
pub use error::ProxyError;
pub use executor::{AlwaysReject, ApprovalCallback, Executor, NullExecutor};
pub use proxy::{ActionResult, ExecutionMode, ExecutionProxy};
pub use request::ActionRequest;
