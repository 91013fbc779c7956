//! # warden-violations
//!
//! The stable violation code vocabulary (V001–V006) and a durable,
//! append-only tracker that persists violation records one per line, one
//! file per task-day. Depends on nothing but the filesystem — every
//! other component treats this crate as the shared vocabulary for "what
//! kind of governance breach just happened".
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use warden_violations::{ViolationCode, ViolationRecord, ViolationTracker};
//!
//! let tracker = ViolationTracker::new("./.violations")?;
//! tracker.record(&ViolationRecord::new(ViolationCode::V004, "plan-1", "agent-1", "hash-1"))?;
//! # Ok::<(), warden_violations::ViolationError>(())
//! ```

mod code;
mod error;
mod record;
mod tracker;

pub use code::ViolationCode;
pub use error::ViolationError;
pub use record::ViolationRecord;
pub use tracker::ViolationTracker;
