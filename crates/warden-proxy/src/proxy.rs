// proxy.rs — ExecutionProxy: the single gate between a plan and the
// outside world.
//
// Mirrors the six-step admission protocol: verify the persona, look up
// the step's verdict, and only then decide whether to run, mock, or
// reject. Nothing downstream of `execute` ever sees an action the
// validator did not already approve.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;

use warden_constraint::{LoadedProfile, Strictness, Verdict};
use warden_persona::{PersonaContext, PersonaLock};
use warden_plan::ValidationResult;
use warden_violations::{ViolationCode, ViolationRecord, ViolationTracker};

use crate::audit::{AuditEntry, Decision};
use crate::error::ProxyError;
use crate::executor::{ApprovalCallback, Executor};
use crate::request::ActionRequest;

/// How the proxy dispatches an admitted action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Dispatch to the injected [`Executor`].
    Real,
    /// Never touch the executor; return a structured "would execute"
    /// record instead.
    Mock,
    /// Identical to [`ExecutionMode::Mock`], but the audit entry records
    /// `dry_run = true` so operators can distinguish the two.
    DryRun,
}

/// The outcome of one `execute` call: what got decided, and (if it ran)
/// what the executor returned.
#[derive(Debug, Clone)]
pub struct ActionResult {
    pub decision: Decision,
    pub output: Option<serde_json::Value>,
    pub error: Option<String>,
}

/// The execution proxy. Holds non-owning references to the persona and
/// the loaded profile for the duration of a task — it does not own
/// either, per the ownership model: the façade that constructed them
/// keeps that ownership.
pub struct ExecutionProxy<'a> {
    persona: &'a PersonaContext,
    profile: &'a LoadedProfile,
    mode: ExecutionMode,
    executor: Box<dyn Executor>,
    approval_cb: Option<Box<dyn ApprovalCallback>>,
    violations: &'a ViolationTracker,
    audit_log: Vec<AuditEntry>,
    audit_dir: Option<PathBuf>,
}

impl<'a> ExecutionProxy<'a> {
    pub fn new(
        persona: &'a PersonaContext,
        profile: &'a LoadedProfile,
        mode: ExecutionMode,
        executor: Box<dyn Executor>,
        approval_cb: Option<Box<dyn ApprovalCallback>>,
        violations: &'a ViolationTracker,
    ) -> Self {
        Self {
            persona,
            profile,
            mode,
            executor,
            approval_cb,
            violations,
            audit_log: Vec::new(),
            audit_dir: None,
        }
    }

    /// Enable strictness-C per-entry audit durability: every admitted
    /// action, starting with the next one, is additionally appended and
    /// fsynced to a dated JSONL file under `dir` as it is decided — not
    /// only held in the in-memory log. A no-op at strictness A/B.
    pub fn with_audit_dir(mut self, dir: PathBuf) -> Self {
        self.audit_dir = Some(dir);
        self
    }

    /// The audit entries admitted so far, in admission order.
    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit_log
    }

    /// Run the six-step admission protocol for one action request.
    pub fn execute(
        &mut self,
        request: &ActionRequest,
        validation: &ValidationResult,
    ) -> Result<ActionResult, ProxyError> {
        tracing::debug!(
            plan_id = %request.plan_id,
            step = request.step_index,
            category = %request.category,
            "admitting action"
        );

        // Step 2: persona integrity.
        if !PersonaLock::verify_integrity(self.persona) {
            return self.reject_with_violation(
                request,
                ViolationCode::V001,
                "persona integrity check failed at admission time".to_string(),
            );
        }

        // Step 3: locate the step's verdict.
        let Some(step_verdict) = validation.verdict_for_step(request.step_index) else {
            return self.reject_with_violation(
                request,
                ViolationCode::V006,
                format!(
                    "no validation verdict found for step {} of plan {}",
                    request.step_index, request.plan_id
                ),
            );
        };

        match step_verdict.verdict {
            // Step 4: blocked verdicts never execute.
            Verdict::Block => {
                let code = step_verdict.violation.unwrap_or(ViolationCode::V005);
                self.reject_with_violation(request, code, step_verdict.reason.clone())
            }
            // Step 5: escalated verdicts need explicit approval.
            Verdict::Escalate => {
                let approved = self
                    .approval_cb
                    .as_ref()
                    .map(|cb| cb.approve(request, &step_verdict.reason))
                    .unwrap_or(false);
                if approved {
                    tracing::info!(plan_id = %request.plan_id, step = request.step_index, "escalation approved");
                    self.dispatch(request)
                } else {
                    tracing::warn!(plan_id = %request.plan_id, step = request.step_index, "escalation rejected or unanswered");
                    self.reject_with_violation(
                        request,
                        ViolationCode::V006,
                        "escalated action was rejected or had no approval callback".to_string(),
                    )
                }
            }
            // Step 6: allowed verdicts dispatch to the executor (or mock).
            Verdict::Allow => self.dispatch(request),
        }
    }

    fn dispatch(&mut self, request: &ActionRequest) -> Result<ActionResult, ProxyError> {
        let (decision, output, error) = match self.mode {
            ExecutionMode::Real => match self.executor.execute(request) {
                Ok(output) => (Decision::Executed, Some(output), None),
                Err(reason) => (Decision::Executed, None, Some(reason)),
            },
            // Mock and dry-run never touch the injected executor — the
            // whole point is zero side effects, even when the caller
            // wired up a real executor. The "would execute" record is
            // synthesized here from the request alone.
            ExecutionMode::Mock | ExecutionMode::DryRun => {
                (Decision::Mocked, Some(mock_output(request)), None)
            }
        };

        let entry = AuditEntry {
            timestamp: Utc::now(),
            plan_id: request.plan_id.clone(),
            persona_id: self.persona.agent_id().to_string(),
            constraint_hash: self.profile.constraint_hash.clone(),
            action_type: request.category,
            target: request.target.clone(),
            decision,
            executed: matches!(decision, Decision::Executed),
            error: error.clone(),
            dry_run: self.mode == ExecutionMode::DryRun,
            output: output.clone(),
        };
        self.push_entry(entry)?;

        Ok(ActionResult {
            decision,
            output,
            error,
        })
    }

    fn reject_with_violation(
        &mut self,
        request: &ActionRequest,
        code: ViolationCode,
        reason: String,
    ) -> Result<ActionResult, ProxyError> {
        let record = ViolationRecord::with_description(
            code,
            reason.clone(),
            request.plan_id.clone(),
            self.persona.agent_id().to_string(),
            self.profile.constraint_hash.clone(),
        );
        self.violations
            .record(&record)
            .map_err(ProxyError::ViolationRecordFailed)?;

        let entry = AuditEntry {
            timestamp: Utc::now(),
            plan_id: request.plan_id.clone(),
            persona_id: self.persona.agent_id().to_string(),
            constraint_hash: self.profile.constraint_hash.clone(),
            action_type: request.category,
            target: request.target.clone(),
            decision: Decision::Blocked,
            executed: false,
            error: Some(reason.clone()),
            dry_run: false,
            output: None,
        };
        self.push_entry(entry)?;

        Ok(ActionResult {
            decision: Decision::Blocked,
            output: None,
            error: Some(reason),
        })
    }

    /// Append `entry` to the in-memory log, and, under strictness C with
    /// an audit directory configured, synchronously flush it to disk
    /// before returning — the "per-entry flush" durability choice the
    /// spec reserves for high-assurance strictness.
    fn push_entry(&mut self, entry: AuditEntry) -> Result<(), ProxyError> {
        if self.profile.profile.strictness() == Strictness::C {
            if let Some(dir) = &self.audit_dir {
                flush_entry(dir, &entry)?;
            }
        }
        self.audit_log.push(entry);
        Ok(())
    }
}

/// A structured "would execute" record derived only from the request —
/// no executor call, no side effects, the same body every time for the
/// same request.
fn mock_output(request: &ActionRequest) -> serde_json::Value {
    serde_json::json!({
        "would_execute": true,
        "category": request.category.to_string(),
        "target": request.target,
    })
}

/// Append `entry` as one JSONL line to `dir/audit_<YYYYMMDD>.log`,
/// flushing and syncing before returning. Mirrors
/// `warden_violations::ViolationTracker`'s append-and-sync discipline.
fn flush_entry(dir: &std::path::Path, entry: &AuditEntry) -> Result<(), ProxyError> {
    std::fs::create_dir_all(dir).map_err(|source| ProxyError::AuditWriteFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(format!("audit_{}.log", Utc::now().format("%Y%m%d")));
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| ProxyError::AuditWriteFailed {
            path: path.clone(),
            source,
        })?;
    let mut line = serde_json::to_string(entry).expect("AuditEntry always serializes");
    line.push('\n');
    file.write_all(line.as_bytes())
        .map_err(|source| ProxyError::AuditWriteFailed {
            path: path.clone(),
            source,
        })?;
    file.flush().map_err(|source| ProxyError::AuditWriteFailed {
        path: path.clone(),
        source,
    })?;
    file.sync_data().map_err(|source| ProxyError::AuditWriteFailed { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{AlwaysReject, NullExecutor};
    use std::collections::BTreeMap;
    use tempfile::tempdir;
    use warden_constraint::{ActionCategory, ConstraintProfile};
    use warden_plan::PlanValidator;

    fn persona() -> PersonaContext {
        PersonaLock::seal("agent-1", warden_persona::AgentType::Coding, Vec::new()).unwrap()
    }

    fn loaded_profile(map: BTreeMap<ActionCategory, Verdict>, deny: Vec<&str>) -> LoadedProfile {
        let profile = ConstraintProfile {
            name: "test".to_string(),
            parent: None,
            strictness: None,
            action_policy_map: map,
            deny_list: deny.into_iter().map(String::from).collect(),
            allow_list: vec![],
            bypass_indicators: vec![],
        };
        let hash = warden_constraint::hash_profile(&profile);
        LoadedProfile {
            profile,
            constraint_hash: hash,
        }
    }

    #[test]
    fn allowed_action_executes_and_audits() {
        let persona = persona();
        let mut map = BTreeMap::new();
        map.insert(ActionCategory::FileRead, Verdict::Allow);
        let profile = loaded_profile(map, vec![]);
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        let mut proxy = ExecutionProxy::new(
            &persona,
            &profile,
            ExecutionMode::Real,
            Box::new(NullExecutor),
            None,
            &tracker,
        );

        let validation = PlanValidator::validate_task("plan-1", "read file a.py", &profile);
        let request = ActionRequest::new("plan-1", 0, ActionCategory::FileRead, "a.py");
        let result = proxy.execute(&request, &validation).unwrap();

        assert_eq!(result.decision, Decision::Executed);
        assert_eq!(proxy.audit_log().len(), 1);
        assert_eq!(proxy.audit_log()[0].constraint_hash, profile.constraint_hash);
    }

    #[test]
    fn blocked_action_never_dispatches() {
        let persona = persona();
        let mut map = BTreeMap::new();
        map.insert(ActionCategory::ShellExec, Verdict::Escalate);
        let profile = loaded_profile(map, vec!["rm -rf"]);
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        let mut proxy = ExecutionProxy::new(
            &persona,
            &profile,
            ExecutionMode::Real,
            Box::new(NullExecutor),
            None,
            &tracker,
        );

        let validation =
            PlanValidator::validate_task("plan-2", "delete everything with rm -rf", &profile);
        let request = ActionRequest::new(
            "plan-2",
            0,
            ActionCategory::ShellExec,
            "delete everything with rm -rf",
        );
        let result = proxy.execute(&request, &validation).unwrap();

        assert_eq!(result.decision, Decision::Blocked);
        let recorded = tracker.list_for_task("plan-2").unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].code, ViolationCode::V002);
    }

    #[test]
    fn escalated_action_with_no_callback_degrades_to_block() {
        let persona = persona();
        let profile = loaded_profile(BTreeMap::new(), vec![]);
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        let mut proxy = ExecutionProxy::new(
            &persona,
            &profile,
            ExecutionMode::Real,
            Box::new(NullExecutor),
            None,
            &tracker,
        );

        let validation = PlanValidator::validate_task("plan-3", "read file a.py", &profile);
        let request = ActionRequest::new("plan-3", 0, ActionCategory::FileRead, "a.py");
        let result = proxy.execute(&request, &validation).unwrap();

        assert_eq!(result.decision, Decision::Blocked);
        let recorded = tracker.list_for_task("plan-3").unwrap();
        assert_eq!(recorded[0].code, ViolationCode::V006);
    }

    #[test]
    fn escalated_action_rejected_explicitly_blocks() {
        let persona = persona();
        let profile = loaded_profile(BTreeMap::new(), vec![]);
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        let mut proxy = ExecutionProxy::new(
            &persona,
            &profile,
            ExecutionMode::Real,
            Box::new(NullExecutor),
            Some(Box::new(AlwaysReject)),
            &tracker,
        );

        let validation = PlanValidator::validate_task("plan-4", "read file a.py", &profile);
        let request = ActionRequest::new("plan-4", 0, ActionCategory::FileRead, "a.py");
        let result = proxy.execute(&request, &validation).unwrap();
        assert_eq!(result.decision, Decision::Blocked);
    }

    #[test]
    fn unknown_step_index_raises_v006() {
        let persona = persona();
        let mut map = BTreeMap::new();
        map.insert(ActionCategory::FileRead, Verdict::Allow);
        let profile = loaded_profile(map, vec![]);
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        let mut proxy = ExecutionProxy::new(
            &persona,
            &profile,
            ExecutionMode::Real,
            Box::new(NullExecutor),
            None,
            &tracker,
        );

        let validation = PlanValidator::validate_task("plan-5", "read file a.py", &profile);
        let request = ActionRequest::new("plan-5", 99, ActionCategory::FileRead, "a.py");
        let result = proxy.execute(&request, &validation).unwrap();
        assert_eq!(result.decision, Decision::Blocked);
        assert_eq!(
            tracker.list_for_task("plan-5").unwrap()[0].code,
            ViolationCode::V006
        );
    }

    #[test]
    fn mock_mode_never_marks_executed() {
        let persona = persona();
        let mut map = BTreeMap::new();
        map.insert(ActionCategory::FileWrite, Verdict::Allow);
        let profile = loaded_profile(map, vec![]);
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        let mut proxy = ExecutionProxy::new(
            &persona,
            &profile,
            ExecutionMode::Mock,
            Box::new(NullExecutor),
            None,
            &tracker,
        );

        let validation = PlanValidator::validate_task("plan-6", "write a new config file", &profile);
        let request = ActionRequest::new("plan-6", 0, ActionCategory::FileWrite, "config.toml");
        let result = proxy.execute(&request, &validation).unwrap();
        assert_eq!(result.decision, Decision::Mocked);
        assert!(!proxy.audit_log()[0].executed);
    }

    struct CountingExecutor(std::sync::Arc<std::sync::atomic::AtomicUsize>);

    impl Executor for CountingExecutor {
        fn execute(&self, _request: &ActionRequest) -> Result<serde_json::Value, String> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(serde_json::json!({ "side_effect": true }))
        }
    }

    #[test]
    fn mock_mode_never_calls_a_real_executor() {
        let persona = persona();
        let mut map = BTreeMap::new();
        map.insert(ActionCategory::FileWrite, Verdict::Allow);
        let profile = loaded_profile(map, vec![]);
        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        let calls = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut proxy = ExecutionProxy::new(
            &persona,
            &profile,
            ExecutionMode::Mock,
            Box::new(CountingExecutor(calls.clone())),
            None,
            &tracker,
        );

        let validation = PlanValidator::validate_task("plan-7", "write file out.txt", &profile);
        let request = ActionRequest::new("plan-7", 0, ActionCategory::FileWrite, "out.txt");
        let first = proxy.execute(&request, &validation).unwrap();
        let second = proxy.execute(&request, &validation).unwrap();

        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
        assert_eq!(first.decision, Decision::Mocked);
        assert_eq!(first.output, second.output);
    }

    #[test]
    fn strictness_c_flushes_audit_entries_to_disk_per_action() {
        let persona = persona();
        let mut map = BTreeMap::new();
        map.insert(ActionCategory::FileRead, Verdict::Allow);
        let mut profile = loaded_profile(map, vec![]);
        profile.profile.strictness = Some(warden_constraint::Strictness::C);
        profile.constraint_hash = warden_constraint::hash_profile(&profile.profile);

        let dir = tempdir().unwrap();
        let tracker = ViolationTracker::new(dir.path()).unwrap();
        let audit_dir = dir.path().join("audit");
        let mut proxy = ExecutionProxy::new(
            &persona,
            &profile,
            ExecutionMode::Real,
            Box::new(NullExecutor),
            None,
            &tracker,
        )
        .with_audit_dir(audit_dir.clone());

        let validation = PlanValidator::validate_task("plan-8", "read file a.py", &profile);
        let request = ActionRequest::new("plan-8", 0, ActionCategory::FileRead, "a.py");
        proxy.execute(&request, &validation).unwrap();

        let entries: Vec<_> = std::fs::read_dir(&audit_dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries.len(), 1);
        let contents = std::fs::read_to_string(&entries[0]).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }
}
