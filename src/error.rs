//! Error types for fsfuzz
//!
//! This module defines the error hierarchy for:
//! - Enumeration failures (directory open/read, metadata query)
//! - Configuration validation
//! - Worker thread lifecycle
//! - Daemonization
//!
//! Enumeration errors never leave the enumerator; they are logged and the
//! offending entry is left out of the target set. Per-iteration fuzz I/O
//! errors are not represented at all.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for fsfuzz
#[derive(Error, Debug)]
pub enum FuzzError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Nothing to fuzz after enumeration
    #[error("Directory listing of '{}' was empty", root.display())]
    EmptyTargetSet { root: PathBuf },

    /// Daemonization failed
    #[error("Daemonize error: {0}")]
    Daemonize(#[from] DaemonError),

    /// Worker/concurrency errors
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
}

/// Failure while enumerating a single directory or entry
#[derive(Error, Debug)]
pub enum EnumerateError {
    /// Directory could not be opened
    #[error("Failed to open directory '{}': {source}", path.display())]
    OpenDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// readdir failed after the directory was opened
    #[error("Failed to read directory '{}': {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// lstat failed for an entry
    #[error("Failed to get file metadata '{}': {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EnumerateError {
    /// Path the failure refers to
    pub fn path(&self) -> &std::path::Path {
        match self {
            EnumerateError::OpenDir { path, .. } => path,
            EnumerateError::ReadDir { path, .. } => path,
            EnumerateError::Metadata { path, .. } => path,
        }
    }

    /// Check if this error is an access denial (expected when not root)
    pub fn is_permission_denied(&self) -> bool {
        let source = match self {
            EnumerateError::OpenDir { source, .. } => source,
            EnumerateError::ReadDir { source, .. } => source,
            EnumerateError::Metadata { source, .. } => source,
        };
        source.kind() == std::io::ErrorKind::PermissionDenied
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid worker count
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// Invalid buffer capacity
    #[error("Invalid buffer capacity {capacity}: must be between 1 and {max}")]
    InvalidBufferCapacity { capacity: usize, max: usize },
}

/// Worker thread errors
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Thread could not be spawned
    #[error("Failed to spawn worker {id}: {reason}")]
    SpawnFailed { id: usize, reason: String },

    /// Worker panicked
    #[error("Worker {id} panicked")]
    Panicked { id: usize },
}

/// Daemonization errors
#[derive(Error, Debug)]
pub enum DaemonError {
    /// daemon(3) failed
    #[error("Failed to daemonize: {0}")]
    Detach(#[from] nix::Error),
}

/// Result type alias for FuzzError
pub type Result<T> = std::result::Result<T, FuzzError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_enumerate_error_permission_denied() {
        let denied = EnumerateError::OpenDir {
            path: "/root/secret".into(),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(denied.is_permission_denied());
        assert_eq!(denied.path(), std::path::Path::new("/root/secret"));

        let missing = EnumerateError::Metadata {
            path: "/gone".into(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(!missing.is_permission_denied());
    }

    #[test]
    fn test_read_dir_error_message() {
        let err = EnumerateError::ReadDir {
            path: "/mnt/flaky".into(),
            source: io::Error::from_raw_os_error(5),
        };
        assert!(err.to_string().starts_with("Failed to read directory '/mnt/flaky'"));
        assert_eq!(err.path(), std::path::Path::new("/mnt/flaky"));
        assert!(!err.is_permission_denied());
    }

    #[test]
    fn test_error_conversion() {
        let cfg = ConfigError::InvalidWorkerCount { count: 0, max: 512 };
        let err: FuzzError = cfg.into();
        assert!(matches!(err, FuzzError::Config(_)));
        assert!(err.to_string().contains("Invalid worker count 0"));
    }

    #[test]
    fn test_empty_target_set_message() {
        let err = FuzzError::EmptyTargetSet { root: "/".into() };
        assert_eq!(err.to_string(), "Directory listing of '/' was empty");
    }
}
