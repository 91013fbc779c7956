// profile.rs — The on-disk constraint profile schema and its merged,
// hash-bound runtime form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::category::{ActionCategory, Strictness, Verdict};

/// A constraint profile as authored on disk (YAML) and after inheritance
/// merge. Every field that participates in the governance surface is part
/// of the canonical hash computed in [`crate::canon`] — including
/// `bypass_indicators`, which earlier designs kept as a hardcoded list in
/// the plan validator; here it is authored data so that changing it
/// changes the hash an agent is bound to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintProfile {
    pub name: String,

    /// The name of a profile this one inherits from, if any. Resolved and
    /// merged away by [`crate::loader::ConstraintLoader`]; a merged
    /// profile never round-trips with `parent` set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(default)]
    pub strictness: Option<Strictness>,

    /// Verdict per action category. Categories absent from the file
    /// inherit from the parent (or fall back to `Verdict::Block` for
    /// `Unknown` — see [`ConstraintProfile::resolve`]).
    #[serde(default)]
    pub action_policy_map: BTreeMap<ActionCategory, Verdict>,

    /// Glob or literal patterns that are always blocked, regardless of
    /// the category verdict. A deny-list match always wins over an allow
    /// verdict — see the deny-overrides-allow invariant.
    #[serde(default)]
    pub deny_list: Vec<String>,

    /// Glob or literal patterns that narrow an `Allow`/`Escalate` verdict;
    /// empty means "no additional narrowing" rather than "allow nothing".
    #[serde(default)]
    pub allow_list: Vec<String>,

    /// Free-text fragments that mark a plan step as a bypass attempt
    /// (e.g. "ignore previous instructions", "bypass governance").
    /// Matching is case-insensitive substring matching.
    #[serde(default)]
    pub bypass_indicators: Vec<String>,
}

impl ConstraintProfile {
    /// Look up the effective verdict for a category. A category absent
    /// from the map (including an empty map entirely) escalates rather
    /// than silently allowing or silently blocking — an unclassified
    /// policy gap is a human's decision, not the kernel's.
    pub fn verdict_for(&self, category: ActionCategory) -> Verdict {
        self.action_policy_map
            .get(&category)
            .copied()
            .unwrap_or(Verdict::Escalate)
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness.unwrap_or_default()
    }

    /// True if `target` matches any deny-list pattern. Patterns are
    /// interpreted as glob patterns via [`glob::Pattern`]; a pattern that
    /// fails to compile never matches (fail-closed on an authoring
    /// mistake, not fail-open).
    pub fn matches_deny_list(&self, target: &str) -> bool {
        self.deny_list.iter().any(|p| pattern_matches(p, target))
    }

    /// True if the allow list is non-empty and `target` matches none of
    /// its entries — i.e. the allow list narrows but did not admit this
    /// target.
    pub fn narrowed_out_by_allow_list(&self, target: &str) -> bool {
        !self.allow_list.is_empty()
            && !self.allow_list.iter().any(|p| pattern_matches(p, target))
    }

    /// True if `text` contains any bypass indicator (case-insensitive).
    pub fn matches_bypass_indicator(&self, text: &str) -> Option<&str> {
        let lower = text.to_lowercase();
        self.bypass_indicators
            .iter()
            .find(|ind| lower.contains(&ind.to_lowercase()))
            .map(|s| s.as_str())
    }
}

/// A pattern containing glob metacharacters is matched against the whole
/// target via [`glob::Pattern`]; a plain literal pattern (the common case
/// for command fragments like `"rm -rf"`) is matched as a substring, so a
/// deny-list entry that is a prefix of a longer target (or embedded in a
/// free-text command description) still matches.
fn pattern_matches(pattern: &str, target: &str) -> bool {
    let has_glob_metachars = pattern.contains(['*', '?', '[', ']']);
    if has_glob_metachars {
        match glob::Pattern::new(pattern) {
            Ok(p) => p.matches(target),
            Err(_) => false,
        }
    } else {
        target.contains(pattern)
    }
}

/// A fully-merged constraint profile bound to its canonical hash. This is
/// what [`crate::loader::ConstraintLoader::load`] returns, and the only
/// form other components are allowed to carry around — a
/// [`ConstraintProfile`] by itself is just parsed data, not yet a
/// governance decision surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedProfile {
    pub profile: ConstraintProfile,
    pub constraint_hash: String,
}

impl LoadedProfile {
    pub fn verdict_for(&self, category: ActionCategory) -> Verdict {
        self.profile.verdict_for(category)
    }
}
