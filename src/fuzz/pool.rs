//! Fuzz pool - starts and holds the worker threads
//!
//! The pool is started over a frozen [`TargetSet`] and is never stopped by
//! the binary: `join` blocks for the life of the process. The stop flag
//! exists so tests and benches can run bounded pools.

use crate::config::{worker_seed, FuzzConfig};
use crate::error::{Result, WorkerError};
use crate::fuzz::stats::FuzzProgress;
use crate::fuzz::worker::Worker;
use crate::walker::TargetSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Fixed-size set of running fuzz workers
pub struct FuzzPool {
    workers: Vec<Worker>,
    stop: Arc<AtomicBool>,
    base_seed: u64,
    started: Instant,
}

impl FuzzPool {
    /// Spawn `config.worker_count` workers over `targets`
    pub fn start(targets: Arc<TargetSet>, config: &FuzzConfig) -> Result<Self> {
        config.validate()?;

        let base_seed = config.resolve_seed();
        let stop = Arc::new(AtomicBool::new(false));
        let mut workers = Vec::with_capacity(config.worker_count);

        info!(
            workers = config.worker_count,
            targets = targets.len(),
            seed = base_seed,
            "Starting fuzz workers"
        );

        for id in 0..config.worker_count {
            let spawned = Worker::spawn(
                id,
                Arc::clone(&targets),
                config.buffer_capacity,
                config.fill_byte,
                worker_seed(base_seed, id),
                Arc::clone(&stop),
            );

            match spawned {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    // Don't leave a partial pool running
                    stop.store(true, Ordering::SeqCst);
                    for worker in workers {
                        let _ = worker.join();
                    }
                    return Err(e.into());
                }
            }
        }

        info!(count = workers.len(), "Workers spawned");

        Ok(Self {
            workers,
            stop,
            base_seed,
            started: Instant::now(),
        })
    }

    /// Seed the per-worker generators were derived from
    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Aggregate counters across all workers
    pub fn progress(&self) -> FuzzProgress {
        FuzzProgress::aggregate(self.workers.iter().map(Worker::stats), self.started.elapsed())
    }

    /// True once every worker has returned
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(Worker::is_finished)
    }

    /// Ask every worker to return after its current iteration
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Wait for all workers; reports the first failure after joining the rest
    pub fn join(self) -> std::result::Result<(), WorkerError> {
        let mut first_error = None;

        for worker in self.workers {
            if let Err(e) = worker.join() {
                warn!(error = %e, "Worker failed to join cleanly");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
