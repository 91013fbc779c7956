// loader.rs — Resolves a named profile from a governance directory,
// merges its inheritance chain, and binds the result to a canonical hash.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::canon::{hash_profile, hashes_match};
use crate::category::ActionCategory;
use crate::error::ConstraintError;
use crate::profile::{ConstraintProfile, LoadedProfile};

/// Loads, merges, and hash-binds constraint profiles from a governance
/// directory. Stateless by design — every call resolves from disk, so
/// there is nothing to keep consistent between calls beyond the
/// filesystem itself.
pub struct ConstraintLoader;

impl ConstraintLoader {
    /// Resolve `profile_name` under `governance_dir`, following its
    /// `parent` chain (if any), merging child-overrides-parent, and
    /// returning the merged profile bound to its canonical hash.
    pub fn load(
        profile_name: &str,
        governance_dir: &Path,
    ) -> Result<LoadedProfile, ConstraintError> {
        let mut seen = HashSet::new();
        let merged = Self::resolve_chain(profile_name, governance_dir, &mut seen)?;
        validate_conflicts(&merged)?;
        let constraint_hash = hash_profile(&merged);
        tracing::debug!(profile = %profile_name, hash = %constraint_hash, "constraint profile loaded");
        Ok(LoadedProfile {
            profile: merged,
            constraint_hash,
        })
    }

    /// Recompute a profile's canonical hash and compare it (constant-time)
    /// against a previously recorded `expected_hash`. Used by callers that
    /// persisted a hash at admission time and want to confirm the active
    /// profile has not silently drifted since.
    pub fn verify(profile: &ConstraintProfile, expected_hash: &str) -> bool {
        hashes_match(&hash_profile(profile), expected_hash)
    }

    fn resolve_chain(
        name: &str,
        governance_dir: &Path,
        seen: &mut HashSet<String>,
    ) -> Result<ConstraintProfile, ConstraintError> {
        if !seen.insert(name.to_string()) {
            tracing::warn!(profile = %name, "inheritance cycle detected");
            return Err(ConstraintError::InheritanceError {
                name: name.to_string(),
                reason: format!("cycle detected while resolving '{name}'"),
            });
        }

        let child = read_profile_file(name, governance_dir)?;

        let Some(parent_name) = child.parent.clone() else {
            return Ok(child);
        };

        let parent = Self::resolve_chain(&parent_name, governance_dir, seen).map_err(|e| {
            match e {
                ConstraintError::ProfileNotFound { .. } => ConstraintError::InheritanceError {
                    name: parent_name.clone(),
                    reason: format!("parent profile '{parent_name}' not found"),
                },
                other => other,
            }
        })?;
        Ok(merge(parent, child))
    }
}

fn read_profile_file(
    name: &str,
    governance_dir: &Path,
) -> Result<ConstraintProfile, ConstraintError> {
    let path = profile_path(name, governance_dir)?;
    let raw = std::fs::read_to_string(&path).map_err(|source| ConstraintError::IoError {
        path: path.clone(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|e| ConstraintError::ProfileValidationError {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// Locate the file backing `name` under `governance_dir`. Accepts either
/// `.yaml` or `.yml`, matching the conventions of both extensions in the
/// wild; fails if neither exists.
fn profile_path(name: &str, governance_dir: &Path) -> Result<PathBuf, ConstraintError> {
    for ext in ["yaml", "yml"] {
        let candidate = governance_dir.join(format!("{name}.{ext}"));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    Err(ConstraintError::ProfileNotFound {
        name: name.to_string(),
        dir: governance_dir.to_path_buf(),
    })
}

/// Merge a resolved `parent` with its `child`: the child's explicit
/// entries win, category by category and list by list; anything the
/// child leaves unset is inherited.
fn merge(parent: ConstraintProfile, mut child: ConstraintProfile) -> ConstraintProfile {
    let mut action_policy_map = parent.action_policy_map;
    for (category, verdict) in child.action_policy_map {
        action_policy_map.insert(category, verdict);
    }

    let strictness = child.strictness.or(parent.strictness);

    let mut deny_list = parent.deny_list;
    deny_list.append(&mut child.deny_list);
    deny_list.sort();
    deny_list.dedup();

    let allow_list = if child.allow_list.is_empty() {
        parent.allow_list
    } else {
        child.allow_list
    };

    let mut bypass_indicators = parent.bypass_indicators;
    bypass_indicators.append(&mut child.bypass_indicators);
    bypass_indicators.sort();
    bypass_indicators.dedup();

    ConstraintProfile {
        name: child.name,
        parent: None,
        strictness,
        action_policy_map,
        deny_list,
        allow_list,
        bypass_indicators,
    }
}

/// A pattern that appears in both the deny list and the allow list is an
/// authoring mistake: deny always wins, so an allow-list entry that can
/// never actually admit anything is silently misleading. Surface it as a
/// validation failure instead.
fn validate_conflicts(profile: &ConstraintProfile) -> Result<(), ConstraintError> {
    for pattern in &profile.allow_list {
        if profile.deny_list.contains(pattern) {
            return Err(ConstraintError::ProfileConflictError {
                category: ActionCategory::Unknown.to_string(),
                a: format!("deny_list:{pattern}"),
                b: format!("allow_list:{pattern}"),
            });
        }
    }
    Ok(())
}
