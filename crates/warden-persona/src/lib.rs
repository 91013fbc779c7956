//! # warden-persona
//!
//! Seals an agent's identity into an immutable [`PersonaContext`] and
//! verifies it has not been tampered with. Sealing is a leaf operation —
//! it has no dependency on the constraint profile, the plan, or the
//! proxy — so it can be validated entirely on its own.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use warden_persona::{AgentType, PersonaLock};
//!
//! let persona = PersonaLock::seal("demo-001", AgentType::Coding, vec!["read_file".to_string()])?;
//! assert!(PersonaLock::verify_integrity(&persona));
//! # Ok::<(), warden_persona::PersonaError>(())
//! ```

mod capability;
mod error;
mod lock;
mod persona;

pub use capability::AgentType;
pub use error::PersonaError;
pub use lock::PersonaLock;
pub use persona::PersonaContext;
