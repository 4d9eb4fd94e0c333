//! Concurrent blind fuzzing
//!
//! ```text
//!                 Arc<TargetSet> (frozen, read-only)
//!                          │
//!      ┌───────────────────┼───────────────────┐
//!      ▼                   ▼                   ▼
//! ┌──────────┐        ┌──────────┐        ┌──────────┐
//! │ fuzz-0   │        │ fuzz-1   │  ...   │ fuzz-N   │
//! │ StdRng   │        │ StdRng   │        │ StdRng   │
//! │ buffers  │        │ buffers  │        │ buffers  │
//! └──────────┘        └──────────┘        └──────────┘
//!   pick → open → read/write 0..=cap bytes → close → repeat
//! ```
//!
//! Workers never coordinate. Concurrent reads and writes against the same
//! file interleave in whatever order the kernel picks.

pub mod pool;
pub mod stats;
pub mod worker;

pub use pool::FuzzPool;
pub use stats::{FuzzProgress, FuzzStats};
pub use worker::{is_process_entry, FuzzWorker, StepOutcome, Worker};
