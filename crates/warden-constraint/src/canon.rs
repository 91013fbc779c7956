// canon.rs — Canonical serialization and hashing of a merged constraint
// profile.
//
// Two profiles that mean the same thing must hash the same, regardless of
// field order in the source YAML or insertion order of list entries. We
// get this by building the canonical form out of a `BTreeMap` (sorted by
// construction) for the policy map, and by explicitly sorting every list
// field before hashing. sha2 is reused here rather than introducing a
// second hashing crate.

use sha2::{Digest, Sha256};

use crate::profile::ConstraintProfile;

/// A deterministic, whitespace-normalized JSON rendering of a profile,
/// suitable for hashing or for byte-for-byte equality comparison across
/// reloads.
pub fn canonicalize(profile: &ConstraintProfile) -> String {
    let mut sorted = profile.clone();
    sorted.deny_list.sort();
    sorted.allow_list.sort();
    sorted.bypass_indicators.sort();
    // `action_policy_map` is already a BTreeMap, so serde_json emits its
    // entries in sorted key order without further work.
    serde_json::to_string(&sorted).expect("ConstraintProfile always serializes")
}

/// The canonical hash of a profile: SHA-256 over [`canonicalize`]'s
/// output, hex-encoded. This is the `constraint_hash` every downstream
/// component binds actions to.
pub fn hash_profile(profile: &ConstraintProfile) -> String {
    let canon = canonicalize(profile);
    let mut hasher = Sha256::new();
    hasher.update(canon.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Constant-time comparison of two hash strings. Used when verifying a
/// profile against an externally supplied expected hash, so that
/// verification timing does not leak how many leading hex digits matched.
pub fn hashes_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{ActionCategory, Verdict};

    fn profile() -> ConstraintProfile {
        let mut p = ConstraintProfile {
            name: "test".to_string(),
            parent: None,
            strictness: None,
            action_policy_map: Default::default(),
            deny_list: vec!["b".to_string(), "a".to_string()],
            allow_list: vec![],
            bypass_indicators: vec![],
        };
        p.action_policy_map
            .insert(ActionCategory::FileRead, Verdict::Allow);
        p
    }

    #[test]
    fn hash_is_stable_across_equal_profiles() {
        let p1 = profile();
        let p2 = profile();
        assert_eq!(hash_profile(&p1), hash_profile(&p2));
    }

    #[test]
    fn hash_ignores_list_insertion_order() {
        let mut p1 = profile();
        let mut p2 = profile();
        p1.deny_list = vec!["a".to_string(), "b".to_string()];
        p2.deny_list = vec!["b".to_string(), "a".to_string()];
        assert_eq!(hash_profile(&p1), hash_profile(&p2));
    }

    #[test]
    fn different_profiles_hash_differently() {
        let p1 = profile();
        let mut p2 = profile();
        p2.name = "other".to_string();
        assert_ne!(hash_profile(&p1), hash_profile(&p2));
    }

    #[test]
    fn hashes_match_rejects_different_length() {
        assert!(!hashes_match("abc", "ab"));
    }

    #[test]
    fn hashes_match_accepts_equal_strings() {
        assert!(hashes_match("deadbeef", "deadbeef"));
    }
}
