//! Observational fuzz counters
//!
//! Nothing in the fuzz loop reads these back; they only feed status lines
//! and tests.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Counters owned by one worker
#[derive(Debug, Default)]
pub struct FuzzStats {
    /// Loop iterations, including excluded selections
    pub iterations: AtomicU64,

    /// Selections skipped as process pseudo-files
    pub excluded: AtomicU64,

    /// Read attempts (target marked readable)
    pub reads_attempted: AtomicU64,

    /// Read attempts whose open succeeded
    pub reads_opened: AtomicU64,

    /// Write attempts (target marked writable)
    pub writes_attempted: AtomicU64,

    /// Write attempts whose open succeeded
    pub writes_opened: AtomicU64,

    /// Largest length ever passed to read or write
    pub largest_request: AtomicUsize,
}

impl FuzzStats {
    pub(crate) fn record_iteration(&self) {
        self.iterations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_excluded(&self) {
        self.excluded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_read(&self, opened: bool) {
        self.reads_attempted.fetch_add(1, Ordering::Relaxed);
        if opened {
            self.reads_opened.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_write(&self, opened: bool) {
        self.writes_attempted.fetch_add(1, Ordering::Relaxed);
        if opened {
            self.writes_opened.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_request(&self, len: usize) {
        self.largest_request.fetch_max(len, Ordering::Relaxed);
    }
}

/// Aggregate snapshot across all workers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FuzzProgress {
    pub iterations: u64,
    pub excluded: u64,
    pub reads_attempted: u64,
    pub reads_opened: u64,
    pub writes_attempted: u64,
    pub writes_opened: u64,
    pub largest_request: usize,
    pub workers: usize,
    pub elapsed: Duration,
}

impl FuzzProgress {
    /// Sum the counters of several workers
    pub fn aggregate<'a, I>(stats: I, elapsed: Duration) -> Self
    where
        I: IntoIterator<Item = &'a FuzzStats>,
    {
        let mut progress = FuzzProgress {
            elapsed,
            ..Default::default()
        };

        for s in stats {
            progress.workers += 1;
            progress.iterations += s.iterations.load(Ordering::Relaxed);
            progress.excluded += s.excluded.load(Ordering::Relaxed);
            progress.reads_attempted += s.reads_attempted.load(Ordering::Relaxed);
            progress.reads_opened += s.reads_opened.load(Ordering::Relaxed);
            progress.writes_attempted += s.writes_attempted.load(Ordering::Relaxed);
            progress.writes_opened += s.writes_opened.load(Ordering::Relaxed);
            progress.largest_request = progress
                .largest_request
                .max(s.largest_request.load(Ordering::Relaxed));
        }

        progress
    }

    pub fn iterations_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.iterations as f64 / secs
        } else {
            0.0
        }
    }
}
