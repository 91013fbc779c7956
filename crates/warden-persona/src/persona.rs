// persona.rs — Sealed agent identity.
//
// Sealing is expressed structurally rather than by intercepting attribute
// assignment: `PersonaContext` has no public mutating method and no
// public constructor other than `PersonaLock::seal`. There is no setter
// surface to guard against, because there is no setter. See DESIGN.md,
// "PersonaLock structural immutability", for why this departs from the
// runtime-exception mechanism of the prototype this was distilled from.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::capability::AgentType;
use crate::error::PersonaError;

/// An agent identity, sealed at construction. Every field is private;
/// the only way to inspect one is through the read-only accessors below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaContext {
    agent_id: String,
    agent_type: AgentType,
    capabilities: BTreeSet<String>,
    created_at: DateTime<Utc>,
    identity_hash: String,
}

impl PersonaContext {
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    pub fn agent_type(&self) -> AgentType {
        self.agent_type
    }

    pub fn capabilities(&self) -> &BTreeSet<String> {
        &self.capabilities
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn identity_hash(&self) -> &str {
        &self.identity_hash
    }

    /// Recompute the identity hash from the live fields and compare it to
    /// the hash recorded at seal time. Always true for a persona that has
    /// only ever existed in memory (there is no way to mutate the fields
    /// it was built from); exists as the cross-check the proxy calls
    /// before every admission, and as the mechanism
    /// [`crate::lock::PersonaLock::verify_against_store`] builds on to
    /// detect a tampered on-disk identity.
    pub fn verify_integrity(&self) -> bool {
        identity_hash(&self.agent_id, self.agent_type, &self.capabilities, self.created_at)
            == self.identity_hash
    }
}

/// Compute the identity hash over the canonical form of the first four
/// persona fields: `agent_id`, `agent_type`, sorted `capabilities`, and
/// `created_at` (RFC 3339). `identity_hash` itself is deliberately
/// excluded from its own input.
pub(crate) fn identity_hash(
    agent_id: &str,
    agent_type: AgentType,
    capabilities: &BTreeSet<String>,
    created_at: DateTime<Utc>,
) -> String {
    let canonical = serde_json::json!({
        "agent_id": agent_id,
        "agent_type": agent_type,
        "capabilities": capabilities,
        "created_at": created_at.to_rfc3339(),
    });
    let bytes = serde_json::to_vec(&canonical).expect("persona fields always serialize");
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    format!("{:x}", hasher.finalize())
}

/// Seals a new persona. The only constructor for [`PersonaContext`].
pub fn seal(
    agent_id: impl Into<String>,
    agent_type: AgentType,
    capabilities: impl IntoIterator<Item = String>,
) -> Result<PersonaContext, PersonaError> {
    let agent_id = agent_id.into();
    let capabilities: BTreeSet<String> = capabilities.into_iter().collect();

    let allowed = agent_type.allowed_capabilities();
    for cap in &capabilities {
        if !allowed.contains(&cap.as_str()) {
            tracing::error!(agent_id = %agent_id, capability = %cap, "capability mismatch during seal");
            return Err(PersonaError::CapabilityMismatch {
                agent_type: agent_type.to_string(),
                capability: cap.clone(),
            });
        }
    }

    let created_at = Utc::now();
    let hash = identity_hash(&agent_id, agent_type, &capabilities, created_at);
    tracing::info!(agent_id = %agent_id, agent_type = %agent_type, "persona sealed");

    Ok(PersonaContext {
        agent_id,
        agent_type,
        capabilities,
        created_at,
        identity_hash: hash,
    })
}

/// Persist `persona`'s identity hash to a sidecar file at `path`, so a
/// later process can detect tampering via
/// [`crate::lock::PersonaLock::verify_against_store`].
pub(crate) fn persist_identity(persona: &PersonaContext, path: &Path) -> Result<(), PersonaError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| PersonaError::StoreWriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, &persona.identity_hash).map_err(|source| {
        PersonaError::StoreWriteFailed {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_succeeds_for_allowed_capabilities() {
        let persona = seal(
            "demo-001",
            AgentType::Coding,
            vec!["read_file".to_string(), "write_file".to_string()],
        )
        .unwrap();
        assert_eq!(persona.agent_id(), "demo-001");
        assert!(persona.verify_integrity());
    }

    #[test]
    fn seal_rejects_disallowed_capability() {
        let err = seal("demo-002", AgentType::Review, vec!["write_file".to_string()])
            .unwrap_err();
        assert!(matches!(err, PersonaError::CapabilityMismatch { .. }));
    }

    #[test]
    fn identical_fields_hash_identically() {
        let mut caps = BTreeSet::new();
        caps.insert("read_file".to_string());
        let ts = Utc::now();
        let h1 = identity_hash("a", AgentType::Coding, &caps, ts);
        let h2 = identity_hash("a", AgentType::Coding, &caps, ts);
        assert_eq!(h1, h2);
    }

    #[test]
    fn different_agent_id_hashes_differently() {
        let caps = BTreeSet::new();
        let ts = Utc::now();
        let h1 = identity_hash("a", AgentType::Coding, &caps, ts);
        let h2 = identity_hash("b", AgentType::Coding, &caps, ts);
        assert_ne!(h1, h2);
    }

    #[test]
    fn persona_has_no_public_mutators() {
        // Structural guarantee, not a runtime check: PersonaContext's
        // fields are private and the type exposes only the accessors
        // above. There is no setter to call here — that absence is the
        // test.
        let persona = seal("demo-003", AgentType::Testing, Vec::new()).unwrap();
        let snapshot = persona.identity_hash().to_string();
        assert_eq!(persona.identity_hash(), snapshot);
    }
}
