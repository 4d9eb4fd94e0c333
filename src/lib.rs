//! fsfuzz - Blind Filesystem Fuzzer
//!
//! Enumerates every regular file reachable from a root directory, then
//! runs a fixed pool of threads that forever pick a random file and issue a
//! random-sized read or write filled with a constant byte. The goal is to
//! shake out kernel, driver and filesystem crashes or corruption by
//! pounding on whatever is reachable: pseudo-files, sysfs knobs, device
//! backed files.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      Enumerator                           │
//! │  explicit stack · lstat · skip symlinks · access() probe  │
//! └─────────────────────────────┬─────────────────────────────┘
//!                               │ TargetSetBuilder::freeze()
//!                               ▼
//!                  ┌──────────────────────────┐
//!                  │  TargetSet (non-empty,   │
//!                  │  read-only, Arc-shared)  │
//!                  └────────────┬─────────────┘
//!                               │
//!       ┌───────────────────────┼───────────────────────┐
//!       ▼                       ▼                       ▼
//! ┌───────────┐           ┌───────────┐           ┌───────────┐
//! │ Worker 0  │           │ Worker 1  │    ...    │ Worker N  │
//! │ own RNG   │           │ own RNG   │           │ own RNG   │
//! └───────────┘           └───────────┘           └───────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use fsfuzz::{Enumerator, FuzzConfig, FuzzPool};
//! use std::sync::Arc;
//!
//! # fn main() -> fsfuzz::Result<()> {
//! let config = FuzzConfig {
//!     worker_count: 4,
//!     ..FuzzConfig::with_root("/sys/kernel/debug")
//! };
//! let listing = Enumerator::new(&config.root).run();
//! let targets = Arc::new(listing.targets.freeze()?);
//! let pool = FuzzPool::start(targets, &config)?;
//! pool.join()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod daemon;
pub mod error;
pub mod fuzz;
pub mod progress;
pub mod walker;

pub use config::FuzzConfig;
pub use error::{FuzzError, Result};
pub use fuzz::{FuzzPool, FuzzProgress, FuzzWorker, StepOutcome};
pub use walker::{Enumeration, Enumerator, FuzzTarget, TargetSet, TargetSetBuilder};
