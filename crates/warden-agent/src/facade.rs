// facade.rs — GovernedAgent: wires the five kernel components together
// behind a single call surface.
//
// This is deliberately *not* part of the enforcement surface: it is thin,
// human-facing wiring over the library crates below. Every governance
// decision still flows through the real `PlanValidator` and
// `ExecutionProxy` — nothing here re-implements or shortcuts them.

use std::path::PathBuf;
use std::sync::Arc;

use warden_constraint::{ConstraintLoader, LoadedProfile};
use warden_persona::{AgentType, PersonaContext, PersonaLock};
use warden_plan::{classify_step, split_into_steps, Plan, PlanStep, PlanValidator, ValidationResult};
use warden_proxy::{
    ActionRequest, ActionResult, ApprovalCallback, AuditEntry, Executor, ExecutionMode,
    ExecutionProxy, NullExecutor,
};
use warden_violations::{ViolationRecord, ViolationTracker};

use crate::config::WardenConfig;
use crate::error::AgentError;

/// The outcome of one `execute_task` call: the plan's verdict plus the
/// per-step results the proxy actually produced.
#[derive(Debug, Clone)]
pub struct TaskExecution {
    pub plan_id: String,
    pub validation: ValidationResult,
    pub results: Vec<ActionResult>,
}

/// Wraps a shared `Arc<dyn Executor>` so the facade can hand the proxy a
/// fresh `Box<dyn Executor>` on every task without giving up ownership
/// of the one it was constructed with.
struct SharedExecutor(Arc<dyn Executor>);

impl Executor for SharedExecutor {
    fn execute(&self, request: &ActionRequest) -> Result<serde_json::Value, String> {
        self.0.execute(request)
    }
}

struct SharedApproval(Arc<dyn ApprovalCallback>);

impl ApprovalCallback for SharedApproval {
    fn approve(&self, request: &ActionRequest, rationale: &str) -> bool {
        self.0.approve(request, rationale)
    }
}

/// A coding (or review/planning/analysis/testing) agent with a sealed
/// identity, a loaded governance matrix, and a private audit/violation
/// trail. Owns its `Persona` and active `LoadedProfile` — the proxy it
/// constructs per task only ever borrows them.
pub struct GovernedAgent {
    persona: PersonaContext,
    profile: LoadedProfile,
    identity_path: PathBuf,
    mode: ExecutionMode,
    executor: Arc<dyn Executor>,
    approval_cb: Option<Arc<dyn ApprovalCallback>>,
    violations: ViolationTracker,
    audit_log: Vec<AuditEntry>,
    audit_dir: PathBuf,
    next_seq: u64,
}

impl GovernedAgent {
    /// Seal a new persona, load `profile_name` from `config.governance_dir`,
    /// open the violation tracker, and persist the sealed identity hash
    /// to a sidecar file under `config.violation_dir`.
    ///
    /// If `config.strictness_override` is set, it replaces whatever
    /// strictness the loaded profile declared and the `constraint_hash`
    /// is recomputed over the overridden profile, so the override
    /// participates in the hashed governance surface like any other
    /// profile field.
    pub fn create(
        agent_id: impl Into<String>,
        agent_type: AgentType,
        capabilities: impl IntoIterator<Item = String>,
        config: &WardenConfig,
        mode: ExecutionMode,
        executor: Arc<dyn Executor>,
        approval_cb: Option<Arc<dyn ApprovalCallback>>,
    ) -> Result<Self, AgentError> {
        let agent_id = agent_id.into();
        let persona = PersonaLock::seal(agent_id.clone(), agent_type, capabilities)?;
        let mut profile = ConstraintLoader::load(&config.default_profile, &config.governance_dir)?;
        if let Some(strictness) = config.strictness_override {
            profile.profile.strictness = Some(strictness);
            profile.constraint_hash = warden_constraint::hash_profile(&profile.profile);
        }
        let violations = ViolationTracker::new(&config.violation_dir)?;

        let identity_path = config.violation_dir.join(format!("{agent_id}.identity"));
        PersonaLock::persist_identity(&persona, &identity_path)?;

        tracing::info!(
            agent_id = %persona.agent_id(),
            agent_type = %persona.agent_type(),
            constraint_hash = %profile.constraint_hash,
            "governed agent created"
        );

        Ok(Self {
            persona,
            profile,
            identity_path,
            mode,
            executor,
            approval_cb,
            violations,
            audit_log: Vec::new(),
            audit_dir: config.audit_dir.clone(),
            next_seq: 0,
        })
    }

    /// Convenience constructor matching the demo's needs: `NullExecutor`,
    /// no approval callback (so every escalation degrades to block).
    pub fn create_with_defaults(
        agent_id: impl Into<String>,
        agent_type: AgentType,
        config: &WardenConfig,
        mode: ExecutionMode,
    ) -> Result<Self, AgentError> {
        Self::create(
            agent_id,
            agent_type,
            Vec::new(),
            config,
            mode,
            Arc::new(NullExecutor),
            None,
        )
    }

    pub fn persona(&self) -> &PersonaContext {
        &self.persona
    }

    pub fn constraint_hash(&self) -> &str {
        &self.profile.constraint_hash
    }

    /// The audit entries admitted across every task this agent has run
    /// so far, in admission order.
    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }

    /// Every violation recorded for `plan_id` across this agent's
    /// lifetime.
    pub fn violations_for(&self, plan_id: &str) -> Result<Vec<ViolationRecord>, AgentError> {
        Ok(self.violations.list_for_task(plan_id)?)
    }

    /// In-memory tamper check against the live persona fields — what the
    /// proxy itself runs before every admission.
    pub fn verify_persona_integrity(&self) -> bool {
        PersonaLock::verify_integrity(&self.persona)
    }

    /// Cross-check against the sidecar identity file persisted at
    /// `create` time — catches an on-disk tampering attempt that a
    /// purely in-memory check cannot.
    pub fn verify_persona_against_store(&self) -> Result<(), AgentError> {
        PersonaLock::verify_against_store(&self.persona, &self.identity_path)?;
        Ok(())
    }

    /// Extract a plan from free text, validate it, and drive every step
    /// through the execution proxy. Returns the plan id, the validator's
    /// full verdict, and the per-step execution results — in that order,
    /// matching admission order.
    pub fn execute_task(&mut self, task: &str) -> Result<TaskExecution, AgentError> {
        let plan_id = format!("task-{:05}", self.next_seq);
        self.next_seq += 1;

        let plan = build_plan(&plan_id, task);
        let validation = PlanValidator::validate(&plan, &self.profile);

        let executor_handle: Box<dyn Executor> = Box::new(SharedExecutor(self.executor.clone()));
        let approval_handle: Option<Box<dyn ApprovalCallback>> = self
            .approval_cb
            .as_ref()
            .map(|cb| Box::new(SharedApproval(cb.clone())) as Box<dyn ApprovalCallback>);

        let mut proxy = ExecutionProxy::new(
            &self.persona,
            &self.profile,
            self.mode,
            executor_handle,
            approval_handle,
            &self.violations,
        )
        .with_audit_dir(self.audit_dir.clone());

        let mut results = Vec::with_capacity(plan.steps.len());
        for (index, step) in plan.steps.iter().enumerate() {
            let request = ActionRequest::new(
                plan_id.clone(),
                index,
                step.action.category,
                step.action.target.clone(),
            );
            results.push(proxy.execute(&request, &validation)?);
        }

        self.audit_log.extend_from_slice(proxy.audit_log());

        Ok(TaskExecution {
            plan_id,
            validation,
            results,
        })
    }
}

fn build_plan(plan_id: &str, task: &str) -> Plan {
    let steps: Vec<PlanStep> = split_into_steps(task)
        .into_iter()
        .map(|description| {
            let action = classify_step(&description);
            PlanStep { description, action }
        })
        .collect();
    Plan::new(plan_id, task, steps)
}
