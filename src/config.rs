//! Configuration types for fsfuzz
//!
//! There is no command-line surface: the binary runs with
//! [`FuzzConfig::default`]. Library callers (tests, benches) override
//! individual fields and call [`FuzzConfig::validate`].

use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;

/// Maximum reasonable worker count
pub const MAX_WORKERS: usize = 512;

/// Default number of fuzz threads
pub const DEFAULT_WORKERS: usize = 128;

/// Default per-worker buffer size (largest single read or write)
pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

/// Upper bound on the buffer size
pub const MAX_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Default payload byte ('A')
pub const DEFAULT_FILL_BYTE: u8 = 0x41;

/// Pause after detaching, long enough to swap a physical cable
pub const DEFAULT_DAEMON_SETTLE: Duration = Duration::from_secs(10);

/// How often the binary logs aggregate fuzz counters
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(30);

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct FuzzConfig {
    /// Directory to enumerate
    pub root: PathBuf,

    /// Number of concurrent fuzz workers
    pub worker_count: usize,

    /// Size of each worker's buffer; reads and writes request 0..=this
    pub buffer_capacity: usize,

    /// Byte every payload is filled with
    pub fill_byte: u8,

    /// Base seed for the per-worker generators (None = from OS entropy)
    pub seed: Option<u64>,

    /// Detach from the controlling terminal before enumerating
    pub daemonize: bool,

    /// Sleep after detaching
    pub daemon_settle: Duration,

    /// Interval between status lines while fuzzing
    pub status_interval: Duration,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/"),
            worker_count: DEFAULT_WORKERS,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            fill_byte: DEFAULT_FILL_BYTE,
            seed: None,
            daemonize: false,
            daemon_settle: DEFAULT_DAEMON_SETTLE,
            status_interval: DEFAULT_STATUS_INTERVAL,
        }
    }
}

impl FuzzConfig {
    /// Default configuration rooted somewhere other than `/`
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Check limits before anything is spawned
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == 0 || self.worker_count > MAX_WORKERS {
            return Err(ConfigError::InvalidWorkerCount {
                count: self.worker_count,
                max: MAX_WORKERS,
            });
        }

        if self.buffer_capacity == 0 || self.buffer_capacity > MAX_BUFFER_CAPACITY {
            return Err(ConfigError::InvalidBufferCapacity {
                capacity: self.buffer_capacity,
                max: MAX_BUFFER_CAPACITY,
            });
        }

        Ok(())
    }

    /// Base seed, drawing one from OS entropy if none was configured
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

/// Derive worker `id`'s seed from the base seed
///
/// SplitMix64 finaliser, so neighbouring ids get unrelated streams.
pub fn worker_seed(base: u64, id: usize) -> u64 {
    let mut z = base.wrapping_add((id as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FuzzConfig::default();
        assert_eq!(config.root, PathBuf::from("/"));
        assert_eq!(config.worker_count, 128);
        assert_eq!(config.buffer_capacity, 8192);
        assert_eq!(config.fill_byte, 0x41);
        assert!(!config.daemonize);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_worker_count() {
        let config = FuzzConfig {
            worker_count: 0,
            ..FuzzConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWorkerCount { count: 0, .. })
        ));

        let config = FuzzConfig {
            worker_count: MAX_WORKERS + 1,
            ..FuzzConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_buffer_capacity() {
        let config = FuzzConfig {
            buffer_capacity: 0,
            ..FuzzConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBufferCapacity { capacity: 0, .. })
        ));
    }

    #[test]
    fn test_fixed_seed_is_kept() {
        let config = FuzzConfig {
            seed: Some(42),
            ..FuzzConfig::with_root("/tmp")
        };
        assert_eq!(config.resolve_seed(), 42);
        assert_eq!(config.root, PathBuf::from("/tmp"));
    }

    #[test]
    fn test_worker_seeds_differ() {
        let seeds: Vec<u64> = (0..64).map(|id| worker_seed(7, id)).collect();
        let mut unique = seeds.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), seeds.len());

        // Deterministic for a given base
        assert_eq!(worker_seed(7, 3), seeds[3]);
        assert_ne!(worker_seed(8, 3), seeds[3]);
    }
}
