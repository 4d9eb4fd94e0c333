//! Single-threaded directory enumeration
//!
//! Walks the tree below a root with an explicit stack of pending
//! directories, so depth is not bounded by the call stack. Each entry is
//! lstat'ed; symlinks are never followed or recorded, directories are
//! pushed for later, and regular files become [`FuzzTarget`]s after an
//! access(2) probe. Everything else is silently left out.
//!
//! Failures are per-directory or per-entry: they are logged and the
//! subtree/entry is excluded, the walk itself always runs to completion.

use crate::error::EnumerateError;
use crate::walker::target::{FuzzTarget, TargetSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn, Level};

/// How many directories between progress callbacks
const PROGRESS_EVERY_DIRS: u64 = 1024;

/// Counters collected during enumeration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumerationStats {
    /// Directories successfully opened
    pub dirs: u64,

    /// Regular files recorded as targets
    pub files: u64,

    /// Symlinks skipped
    pub symlinks: u64,

    /// FIFOs, sockets, device nodes and other non-regular entries
    pub special: u64,

    /// Directory open and metadata failures
    pub errors: u64,
}

/// Snapshot handed to the progress callback
#[derive(Debug, Clone, Default)]
pub struct EnumerationProgress {
    pub dirs: u64,
    pub files: u64,
    pub errors: u64,
    pub pending_dirs: usize,
    pub elapsed: Duration,
}

impl EnumerationProgress {
    pub fn entries_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.files + self.dirs) as f64 / secs
        } else {
            0.0
        }
    }
}

/// Output of a completed enumeration
#[derive(Debug)]
pub struct Enumeration {
    /// Targets found, still in the mutable stage
    pub targets: TargetSetBuilder,

    /// What was seen along the way
    pub stats: EnumerationStats,

    /// Wall-clock time of the walk
    pub duration: Duration,
}

type ProgressFn<'a> = Box<dyn FnMut(&EnumerationProgress) + 'a>;

/// Builds the fuzz target listing for one root
pub struct Enumerator<'a> {
    root: PathBuf,
    progress: Option<ProgressFn<'a>>,
}

impl<'a> Enumerator<'a> {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            progress: None,
        }
    }

    /// Install a callback invoked periodically during the walk
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&EnumerationProgress) + 'a,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Walk the whole tree
    pub fn run(mut self) -> Enumeration {
        let start = Instant::now();
        let mut targets = TargetSetBuilder::new(self.root.clone());
        let mut stats = EnumerationStats::default();
        let mut pending = vec![self.root.clone()];

        info!(root = %self.root.display(), "Enumerating fuzz targets");

        while let Some(dir) = pending.pop() {
            if let Err(e) = scan_directory(&dir, &mut pending, &mut targets, &mut stats) {
                stats.errors += 1;
                log_failure(&e);
                continue;
            }

            if stats.dirs % PROGRESS_EVERY_DIRS == 0 {
                if let Some(callback) = self.progress.as_mut() {
                    callback(&EnumerationProgress {
                        dirs: stats.dirs,
                        files: stats.files,
                        errors: stats.errors,
                        pending_dirs: pending.len(),
                        elapsed: start.elapsed(),
                    });
                }
            }
        }

        let duration = start.elapsed();

        debug!(
            dirs = stats.dirs,
            files = stats.files,
            symlinks = stats.symlinks,
            special = stats.special,
            errors = stats.errors,
            "Enumeration finished"
        );

        Enumeration {
            targets,
            stats,
            duration,
        }
    }
}

/// EACCES is routine when not running as root; anything else is worth a warning
fn failure_level(e: &EnumerateError) -> Level {
    if e.is_permission_denied() {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

fn log_failure(e: &EnumerateError) {
    if failure_level(e) == Level::DEBUG {
        debug!(path = %e.path().display(), error = %e, "Access denied, skipped");
    } else {
        warn!(path = %e.path().display(), error = %e, "Enumeration failure");
    }
}

/// Read one directory, recording files and queueing subdirectories
///
/// Only a failure to open the directory itself is returned; per-entry
/// failures are logged here and counted.
fn scan_directory(
    dir: &Path,
    pending: &mut Vec<PathBuf>,
    targets: &mut TargetSetBuilder,
    stats: &mut EnumerationStats,
) -> Result<(), EnumerateError> {
    let entries = fs::read_dir(dir).map_err(|source| EnumerateError::OpenDir {
        path: dir.to_path_buf(),
        source,
    })?;

    stats.dirs += 1;

    // read_dir never yields "." or ".."
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                stats.errors += 1;
                log_failure(&EnumerateError::ReadDir {
                    path: dir.to_path_buf(),
                    source,
                });
                continue;
            }
        };

        let path = dir.join(entry.file_name());

        // lstat: never follow links
        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(source) => {
                stats.errors += 1;
                log_failure(&EnumerateError::Metadata { path, source });
                continue;
            }
        };

        let file_type = metadata.file_type();
        if file_type.is_symlink() {
            stats.symlinks += 1;
        } else if file_type.is_dir() {
            pending.push(path);
        } else if file_type.is_file() {
            stats.files += 1;
            targets.push(FuzzTarget::probe(path));
        } else {
            stats.special += 1;
        }
    }

    Ok(())
}
