//! # warden-constraint
//!
//! Loads governance matrices ("constraint profiles") from a governance
//! directory, resolves single-parent inheritance, and binds the merged
//! result to a canonical SHA-256 hash. The hash is what every other
//! component in the runtime treats as "the policy currently in force" —
//! nothing downstream interprets a profile without going through this
//! crate first.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use warden_constraint::ConstraintLoader;
//!
//! let loaded = ConstraintLoader::load("default", Path::new("./governance"))?;
//! println!("constraint_hash = {}", loaded.constraint_hash);
//! # Ok::<(), warden_constraint::ConstraintError>(())
//! ```

mod canon;
mod category;
mod error;
mod loader;
mod profile;

pub use canon::{canonicalize, hash_profile, hashes_match};
pub use category::{ActionCategory, Strictness, Verdict};
pub use error::ConstraintError;
pub use loader::ConstraintLoader;
pub use profile::{ConstraintProfile, LoadedProfile};
