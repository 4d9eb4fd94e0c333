//! Fuzz worker thread logic
//!
//! Each worker:
//! - Owns its own seeded RNG and buffers (nothing is shared but the listing)
//! - Picks a random target from the frozen [`TargetSet`]
//! - Skips live process entries under `/proc/<digit>`
//! - Reads and/or writes a random length in `0..=capacity`
//! - Throws every I/O result away and goes again

use crate::error::WorkerError;
use crate::fuzz::stats::FuzzStats;
use crate::walker::TargetSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::trace;

/// Process information pseudo-filesystem
const PROC_PREFIX: &[u8] = b"/proc/";

/// True for paths naming a live process entry (`/proc/<digit>...`)
///
/// Covers our own pid directory as well as every other live process.
pub fn is_process_entry(path: &Path) -> bool {
    path.as_os_str()
        .as_bytes()
        .strip_prefix(PROC_PREFIX)
        .and_then(|rest| rest.first())
        .is_some_and(|b| b.is_ascii_digit())
}

/// What a single iteration did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Selected a process entry, nothing was opened
    Excluded { index: usize },

    /// Read and/or write attempted per the target's flags
    Fuzzed { index: usize },
}

/// Loop state for one worker
pub struct FuzzWorker {
    targets: Arc<TargetSet>,
    rng: StdRng,
    /// Always `fill_byte`; source of every write
    payload: Box<[u8]>,
    /// Destination of reads, pre-filled with `fill_byte`
    scratch: Box<[u8]>,
    stats: Arc<FuzzStats>,
}

impl FuzzWorker {
    pub fn new(
        targets: Arc<TargetSet>,
        buffer_capacity: usize,
        fill_byte: u8,
        seed: u64,
        stats: Arc<FuzzStats>,
    ) -> Self {
        Self {
            targets,
            rng: StdRng::seed_from_u64(seed),
            payload: vec![fill_byte; buffer_capacity].into_boxed_slice(),
            scratch: vec![fill_byte; buffer_capacity].into_boxed_slice(),
            stats,
        }
    }

    pub fn stats(&self) -> &FuzzStats {
        &self.stats
    }

    /// One select-and-fuzz iteration
    pub fn step(&mut self) -> StepOutcome {
        let Self {
            targets,
            rng,
            payload,
            scratch,
            stats,
        } = self;

        stats.record_iteration();

        let index = rng.gen_range(0..targets.len());
        let target = &targets[index];

        if is_process_entry(target.path()) {
            stats.record_excluded();
            return StepOutcome::Excluded { index };
        }

        if target.can_read() {
            let file = File::open(target.path());
            stats.record_read(file.is_ok());
            if let Ok(mut file) = file {
                let len = rng.gen_range(0..=scratch.len());
                stats.record_request(len);
                let _ = file.read(&mut scratch[..len]);
            }
        }

        if target.can_write() {
            let file = OpenOptions::new().write(true).open(target.path());
            stats.record_write(file.is_ok());
            if let Ok(mut file) = file {
                let len = rng.gen_range(0..=payload.len());
                stats.record_request(len);
                let _ = file.write(&payload[..len]);
            }
        }

        StepOutcome::Fuzzed { index }
    }

    /// Step until `stop` is raised (never, outside tests)
    pub fn run(mut self, stop: &AtomicBool) {
        while !stop.load(Ordering::Relaxed) {
            self.step();
        }
    }
}

/// A spawned fuzz thread
pub struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
    stats: Arc<FuzzStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(
        id: usize,
        targets: Arc<TargetSet>,
        buffer_capacity: usize,
        fill_byte: u8,
        seed: u64,
        stop: Arc<AtomicBool>,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(FuzzStats::default());
        let fuzzer = FuzzWorker::new(targets, buffer_capacity, fill_byte, seed, Arc::clone(&stats));

        let handle = thread::Builder::new()
            .name(format!("fuzz-{}", id))
            .spawn(move || {
                trace!(worker = id, seed = seed, "Worker starting");
                fuzzer.run(&stop);
                trace!(worker = id, "Worker stopped");
            })
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn stats(&self) -> &FuzzStats {
        &self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| WorkerError::Panicked { id: self.id }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::{FuzzTarget, TargetSetBuilder};
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn set_of(targets: Vec<FuzzTarget>) -> Arc<TargetSet> {
        let mut builder = TargetSetBuilder::new("/");
        for t in targets {
            builder.push(t);
        }
        Arc::new(builder.freeze().unwrap())
    }

    #[test]
    fn test_is_process_entry() {
        assert!(is_process_entry(Path::new("/proc/1/status")));
        assert!(is_process_entry(Path::new("/proc/4242/mem")));
        assert!(!is_process_entry(Path::new("/proc/self/status")));
        assert!(!is_process_entry(Path::new("/proc/sys/kernel/hostname")));
        assert!(!is_process_entry(Path::new("/proc/")));
        assert!(!is_process_entry(Path::new("/procfs/1/x")));
        assert!(!is_process_entry(Path::new("/tmp/proc/1/x")));
        assert!(!is_process_entry(Path::new("proc/1/status")));
    }

    #[test]
    fn test_process_entries_never_opened() {
        let targets = set_of(vec![
            FuzzTarget::new("/proc/1/status", true, true),
            FuzzTarget::new("/proc/99999999/mem", true, true),
        ]);
        let stats = Arc::new(FuzzStats::default());
        let mut worker = FuzzWorker::new(targets, 64, 0x41, 1, Arc::clone(&stats));

        for _ in 0..500 {
            assert!(matches!(worker.step(), StepOutcome::Excluded { .. }));
        }

        assert_eq!(stats.iterations.load(Ordering::Relaxed), 500);
        assert_eq!(stats.excluded.load(Ordering::Relaxed), 500);
        assert_eq!(stats.reads_attempted.load(Ordering::Relaxed), 0);
        assert_eq!(stats.writes_attempted.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_missing_file_is_silently_skipped() {
        let targets = set_of(vec![FuzzTarget::new(
            PathBuf::from("/nonexistent/fsfuzz/target"),
            true,
            true,
        )]);
        let stats = Arc::new(FuzzStats::default());
        let mut worker = FuzzWorker::new(targets, 64, 0x41, 2, Arc::clone(&stats));

        for _ in 0..10 {
            assert_eq!(worker.step(), StepOutcome::Fuzzed { index: 0 });
        }

        assert_eq!(stats.reads_attempted.load(Ordering::Relaxed), 10);
        assert_eq!(stats.reads_opened.load(Ordering::Relaxed), 0);
        assert_eq!(stats.writes_opened.load(Ordering::Relaxed), 0);
        assert_eq!(stats.largest_request.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_writes_are_bounded_fill_bytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("victim");
        std::fs::write(&path, b"").unwrap();

        let capacity = 256;
        let targets = set_of(vec![FuzzTarget::new(path.clone(), true, true)]);
        let stats = Arc::new(FuzzStats::default());
        let mut worker = FuzzWorker::new(targets, capacity, 0x5a, 3, Arc::clone(&stats));

        for _ in 0..200 {
            worker.step();
        }

        assert_eq!(stats.writes_opened.load(Ordering::Relaxed), 200);
        assert!(stats.largest_request.load(Ordering::Relaxed) <= capacity);

        // Writes start at offset 0 and never truncate
        let contents = std::fs::read(&path).unwrap();
        assert!(contents.len() <= capacity);
        assert!(contents.iter().all(|&b| b == 0x5a));
    }

    #[test]
    fn test_same_seed_same_selection() {
        let targets = set_of(
            (0..32)
                .map(|i| FuzzTarget::new(format!("/proc/{}/x", i), false, false))
                .collect(),
        );

        let run = |seed| {
            let mut worker =
                FuzzWorker::new(Arc::clone(&targets), 8, 0, seed, Arc::new(FuzzStats::default()));
            (0..50).map(|_| worker.step()).collect::<Vec<_>>()
        };

        assert_eq!(run(11), run(11));
        assert_ne!(run(11), run(12));
    }

    #[test]
    fn test_worker_spawn_and_stop() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::write(&path, b"abc").unwrap();

        let targets = set_of(vec![FuzzTarget::new(path, true, false)]);
        let stop = Arc::new(AtomicBool::new(false));
        let worker = Worker::spawn(7, targets, 32, 0x41, 9, Arc::clone(&stop)).unwrap();
        assert_eq!(worker.id(), 7);

        while worker.stats().iterations.load(Ordering::Relaxed) < 10 {
            thread::yield_now();
        }
        stop.store(true, Ordering::SeqCst);

        assert!(worker.join().is_ok());
    }
}
