// validator.rs — PlanValidator: decides whether a plan is admissible.
//
// Verdict resolution splits into a plain, deterministic verdict for
// normal callers (`validate`) and a parallel trace-carrying variant for
// diagnostics (`validate_with_trace`). Determinism is load-bearing here —
// given the same plan text and profile, `validate` must produce the same
// verdict byte-for-byte.

use serde::{Deserialize, Serialize};

use warden_constraint::{ActionCategory, ConstraintProfile, LoadedProfile, Strictness, Verdict};
use warden_violations::ViolationCode;

use crate::action::{is_path_like, ExtractedAction};
use crate::extractor::{classify_step, split_into_steps};
use crate::plan::{Plan, PlanStep};

/// The plan-level outcome, derived from its step verdicts: BLOCKED if
/// any step blocks, else ESCALATE if any step escalates, else APPROVED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    Approved,
    Escalate,
    Blocked,
}

/// The verdict for a single step, plus (if the verdict is adverse) the
/// violation code that would be raised and a human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepVerdict {
    pub step_index: usize,
    pub verdict: Verdict,
    pub violation: Option<ViolationCode>,
    pub reason: String,
}

/// A violation the validator predicts would be raised if the plan (or
/// this step of it) were executed as-is. Distinct from
/// `warden_violations::ViolationRecord`: the validator does not know the
/// executing persona, so it cannot bind `persona_id` — the proxy does
/// that when it actually records a violation during execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictedViolation {
    pub step_index: usize,
    pub code: ViolationCode,
    pub description: String,
}

/// The result of validating one plan against one loaded profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub plan_id: String,
    pub outcome: ValidationOutcome,
    pub step_verdicts: Vec<StepVerdict>,
    pub rationale: String,
    pub violations: Vec<PredictedViolation>,
}

impl ValidationResult {
    /// The verdict recorded for a specific step index, if any — what the
    /// proxy consults at execution time per its per-action protocol step
    /// 3 ("locate the step's verdict in the validation result").
    pub fn verdict_for_step(&self, step_index: usize) -> Option<&StepVerdict> {
        self.step_verdicts.iter().find(|s| s.step_index == step_index)
    }
}

/// One entry in a diagnostic evaluation trace — additive observability
/// that does not change the verdict `validate` would have produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepTrace {
    pub step_index: usize,
    pub check: String,
    pub outcome: String,
}

pub struct PlanValidator;

impl PlanValidator {
    /// Build a [`Plan`] from a free-text task description using the
    /// rule-based extractor, then validate it. Convenience entry point
    /// for a string-in, decision-out call shape.
    pub fn validate_task(plan_id: impl Into<String>, task: &str, profile: &LoadedProfile) -> ValidationResult {
        let steps = split_into_steps(task)
            .into_iter()
            .map(|description| {
                let action = classify_step(&description);
                PlanStep { description, action }
            })
            .collect();
        let plan = Plan::new(plan_id, task, steps);
        Self::validate(&plan, profile)
    }

    /// Validate an already-structured plan (or one built by
    /// [`PlanValidator::validate_task`]) against `profile`.
    pub fn validate(plan: &Plan, profile: &LoadedProfile) -> ValidationResult {
        tracing::debug!(plan_id = %plan.plan_id, steps = plan.steps.len(), "validating plan");

        if let Some((index, indicator)) = find_bypass(plan, &profile.profile) {
            return blocked_by_bypass(plan, index, &indicator);
        }

        let mut step_verdicts = Vec::with_capacity(plan.steps.len());
        let mut violations = Vec::new();

        for (index, step) in plan.steps.iter().enumerate() {
            let (verdict, violation, reason) = resolve_step(&step.action, &profile.profile);
            tracing::debug!(plan_id = %plan.plan_id, step = index, verdict = %verdict, "step verdict resolved");
            if let Some(code) = violation {
                violations.push(PredictedViolation {
                    step_index: index,
                    code,
                    description: reason.clone(),
                });
            }
            step_verdicts.push(StepVerdict {
                step_index: index,
                verdict,
                violation,
                reason,
            });
        }

        let outcome = overall_outcome(&step_verdicts);
        let rationale = rationale_for(outcome, &step_verdicts);

        ValidationResult {
            plan_id: plan.plan_id.clone(),
            outcome,
            step_verdicts,
            rationale,
            violations,
        }
    }

    /// Same resolution as [`PlanValidator::validate`], additionally
    /// returning a per-step trace of which check fired. Never changes the
    /// verdict — purely additive diagnostics for operators.
    pub fn validate_with_trace(
        plan: &Plan,
        profile: &LoadedProfile,
    ) -> (ValidationResult, Vec<StepTrace>) {
        let result = Self::validate(plan, profile);
        let mut trace = Vec::with_capacity(plan.steps.len());
        for step in &result.step_verdicts {
            let check = if result.outcome == ValidationOutcome::Blocked
                && step.violation == Some(ViolationCode::V004)
            {
                "bypass_indicator".to_string()
            } else if step.violation == Some(ViolationCode::V002) {
                "deny_list".to_string()
            } else if step.violation == Some(ViolationCode::V003) {
                "allow_list".to_string()
            } else {
                "action_policy_map".to_string()
            };
            trace.push(StepTrace {
                step_index: step.step_index,
                check,
                outcome: step.verdict.to_string(),
            });
        }
        (result, trace)
    }
}

fn find_bypass(plan: &Plan, profile: &ConstraintProfile) -> Option<(usize, String)> {
    if let Some(indicator) = profile.matches_bypass_indicator(&plan.task) {
        return Some((0, indicator.to_string()));
    }
    for (index, step) in plan.steps.iter().enumerate() {
        if let Some(indicator) = profile.matches_bypass_indicator(&step.description) {
            return Some((index, indicator.to_string()));
        }
    }
    None
}

fn blocked_by_bypass(plan: &Plan, matched_index: usize, indicator: &str) -> ValidationResult {
    tracing::warn!(plan_id = %plan.plan_id, indicator = %indicator, "bypass indicator matched");
    let step_count = plan.steps.len().max(1);
    let step_verdicts = (0..step_count)
        .map(|index| StepVerdict {
            step_index: index,
            verdict: Verdict::Block,
            violation: Some(ViolationCode::V004),
            reason: format!("bypass indicator matched: '{indicator}'"),
        })
        .collect();

    ValidationResult {
        plan_id: plan.plan_id.clone(),
        outcome: ValidationOutcome::Blocked,
        step_verdicts,
        rationale: format!("plan blocked: bypass indicator '{indicator}' detected"),
        violations: vec![PredictedViolation {
            step_index: matched_index,
            code: ViolationCode::V004,
            description: format!("Bypass attempt: matched '{indicator}'"),
        }],
    }
}

fn resolve_step(
    action: &ExtractedAction,
    profile: &ConstraintProfile,
) -> (Verdict, Option<ViolationCode>, String) {
    if profile.matches_deny_list(&action.target) {
        return (
            Verdict::Block,
            Some(ViolationCode::V002),
            format!("target '{}' matched a deny-list pattern", action.target),
        );
    }

    if action.is_write_like()
        && is_path_like(&action.target)
        && profile.narrowed_out_by_allow_list(&action.target)
    {
        return (
            Verdict::Block,
            Some(ViolationCode::V003),
            format!(
                "write target '{}' falls outside the sandbox allow list",
                action.target
            ),
        );
    }

    if action.category == ActionCategory::Unknown {
        if profile.strictness() == Strictness::C {
            return (
                Verdict::Block,
                Some(ViolationCode::V005),
                "action category could not be classified; strictness C rejects any unclassified action".to_string(),
            );
        }
        return (
            Verdict::Escalate,
            None,
            "action category could not be classified".to_string(),
        );
    }

    let verdict = profile.verdict_for(action.category);
    let reason = match verdict {
        Verdict::Allow => format!("{} is allowed by policy", action.category),
        Verdict::Escalate => format!("{} requires human approval", action.category),
        Verdict::Block => format!("{} is blocked by policy", action.category),
    };
    let violation = if verdict == Verdict::Block {
        Some(ViolationCode::V005)
    } else {
        None
    };
    (verdict, violation, reason)
}

fn overall_outcome(step_verdicts: &[StepVerdict]) -> ValidationOutcome {
    if step_verdicts.iter().any(|s| s.verdict == Verdict::Block) {
        ValidationOutcome::Blocked
    } else if step_verdicts.iter().any(|s| s.verdict == Verdict::Escalate) {
        ValidationOutcome::Escalate
    } else {
        ValidationOutcome::Approved
    }
}

fn rationale_for(outcome: ValidationOutcome, step_verdicts: &[StepVerdict]) -> String {
    match outcome {
        ValidationOutcome::Approved => "all steps allowed by policy".to_string(),
        ValidationOutcome::Escalate => format!(
            "{} step(s) require human approval",
            step_verdicts.iter().filter(|s| s.verdict == Verdict::Escalate).count()
        ),
        ValidationOutcome::Blocked => {
            let reasons: Vec<&str> = step_verdicts
                .iter()
                .filter(|s| s.verdict == Verdict::Block)
                .map(|s| s.reason.as_str())
                .collect();
            format!("plan blocked: {}", reasons.join("; "))
        }
    }
}
