// lock.rs — PersonaLock: the component-level facade over sealing and
// integrity verification.

use std::path::Path;

use crate::capability::AgentType;
use crate::error::PersonaError;
use crate::persona::{self, PersonaContext};

/// Stateless facade over persona sealing and integrity verification.
/// Holds no data of its own; every operation takes the persona (and, for
/// the store-backed check, a path) as an argument.
pub struct PersonaLock;

impl PersonaLock {
    /// Validate `capabilities` against the static table for `agent_type`
    /// and return a sealed persona, or a [`PersonaError::CapabilityMismatch`]
    /// if any requested capability is not permitted.
    pub fn seal(
        agent_id: impl Into<String>,
        agent_type: AgentType,
        capabilities: impl IntoIterator<Item = String>,
    ) -> Result<PersonaContext, PersonaError> {
        persona::seal(agent_id, agent_type, capabilities)
    }

    /// In-memory tamper check: recompute the identity hash from the
    /// persona's live fields and compare to the hash recorded at seal
    /// time. This is what callers such as the execution proxy run before
    /// admitting every action.
    pub fn verify_integrity(persona: &PersonaContext) -> bool {
        persona.verify_integrity()
    }

    /// Persist `persona`'s identity hash to `path`, so a later process
    /// (or a later call in the same process) can detect an on-disk
    /// tampering attempt via [`PersonaLock::verify_against_store`].
    pub fn persist_identity(persona: &PersonaContext, path: &Path) -> Result<(), PersonaError> {
        persona::persist_identity(persona, path)
    }

    /// Compare `persona`'s current identity hash against the hash
    /// persisted at `path`. Returns [`PersonaError::LockViolation`]
    /// (violation code V001) if they differ — whether because the
    /// persona's live fields changed (impossible through this crate's own
    /// API, but not impossible for a corrupted in-memory structure
    /// reconstructed by an untrusted deserializer) or because the
    /// sidecar file itself was edited.
    pub fn verify_against_store(persona: &PersonaContext, path: &Path) -> Result<(), PersonaError> {
        let stored = std::fs::read_to_string(path).map_err(|source| PersonaError::StoreReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        if stored.trim() != persona.identity_hash() || !persona.verify_integrity() {
            tracing::error!(agent_id = %persona.agent_id(), "persona lock violation detected");
            return Err(PersonaError::LockViolation {
                agent_id: persona.agent_id().to_string(),
            });
        }
        Ok(())
    }
}
