//! Fuzz target enumeration
//!
//! ```text
//!   root ──► Enumerator (explicit stack, lstat, access probe)
//!                │
//!                ▼
//!        TargetSetBuilder  (append-only, single thread)
//!                │ freeze()
//!                ▼
//!           TargetSet      (non-empty, read-only, Arc-shared)
//! ```

pub mod enumerator;
pub mod target;

pub use enumerator::{Enumeration, EnumerationProgress, EnumerationStats, Enumerator};
pub use target::{FuzzTarget, TargetSet, TargetSetBuilder};
