//! Fuzz targets and the two-stage target set
//!
//! [`TargetSetBuilder`] is the single-threaded, append-only stage used by the
//! enumerator. [`TargetSetBuilder::freeze`] turns it into a [`TargetSet`],
//! which has no mutating methods and is always non-empty. Workers only ever
//! see a `TargetSet` behind an `Arc`.

use crate::error::{FuzzError, Result};
use nix::unistd::{access, AccessFlags};
use std::path::{Path, PathBuf};

/// One regular file eligible for fuzzing
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FuzzTarget {
    path: PathBuf,
    can_read: bool,
    can_write: bool,
}

impl FuzzTarget {
    pub fn new(path: impl Into<PathBuf>, can_read: bool, can_write: bool) -> Self {
        Self {
            path: path.into(),
            can_read,
            can_write,
        }
    }

    /// Build a target, probing access(2) for R_OK and W_OK independently
    ///
    /// The file is not opened.
    pub fn probe(path: PathBuf) -> Self {
        let can_read = access(path.as_path(), AccessFlags::R_OK).is_ok();
        let can_write = access(path.as_path(), AccessFlags::W_OK).is_ok();
        Self {
            path,
            can_read,
            can_write,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn can_read(&self) -> bool {
        self.can_read
    }

    pub fn can_write(&self) -> bool {
        self.can_write
    }
}

/// Append-only collection filled during enumeration
#[derive(Debug)]
pub struct TargetSetBuilder {
    root: PathBuf,
    targets: Vec<FuzzTarget>,
}

impl TargetSetBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            targets: Vec::new(),
        }
    }

    pub fn push(&mut self, target: FuzzTarget) {
        self.targets.push(target);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Freeze into a read-only set; an empty listing is fatal
    pub fn freeze(self) -> Result<TargetSet> {
        if self.targets.is_empty() {
            return Err(FuzzError::EmptyTargetSet { root: self.root });
        }

        Ok(TargetSet {
            targets: self.targets.into_boxed_slice(),
        })
    }
}

/// Frozen, non-empty, randomly indexable listing shared by all workers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet {
    targets: Box<[FuzzTarget]>,
}

impl TargetSet {
    /// Always at least 1
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Never true; present for API symmetry
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&FuzzTarget> {
        self.targets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FuzzTarget> {
        self.targets.iter()
    }

    pub fn readable_count(&self) -> usize {
        self.targets.iter().filter(|t| t.can_read).count()
    }

    pub fn writable_count(&self) -> usize {
        self.targets.iter().filter(|t| t.can_write).count()
    }
}

impl std::ops::Index<usize> for TargetSet {
    type Output = FuzzTarget;

    fn index(&self, index: usize) -> &FuzzTarget {
        &self.targets[index]
    }
}

impl<'a> IntoIterator for &'a TargetSet {
    type Item = &'a FuzzTarget;
    type IntoIter = std::slice::Iter<'a, FuzzTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_freeze_empty_is_error() {
        let builder = TargetSetBuilder::new("/nowhere");
        assert!(builder.is_empty());
        match builder.freeze() {
            Err(FuzzError::EmptyTargetSet { root }) => assert_eq!(root, PathBuf::from("/nowhere")),
            other => panic!("expected EmptyTargetSet, got {:?}", other),
        }
    }

    #[test]
    fn test_freeze_preserves_order_and_counts() {
        let mut builder = TargetSetBuilder::new("/data");
        builder.push(FuzzTarget::new("/data/a", true, true));
        builder.push(FuzzTarget::new("/data/b", true, false));
        builder.push(FuzzTarget::new("/data/c", false, false));
        assert_eq!(builder.len(), 3);

        let set = builder.freeze().unwrap();
        assert_eq!(set.len(), 3);
        assert!(!set.is_empty());
        assert_eq!(set[1].path(), Path::new("/data/b"));
        assert_eq!(set.readable_count(), 2);
        assert_eq!(set.writable_count(), 1);
        assert!(set.get(3).is_none());

        let paths: Vec<_> = set.iter().map(|t| t.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/data/a"),
                PathBuf::from("/data/b"),
                PathBuf::from("/data/c")
            ]
        );
    }

    #[test]
    fn test_probe_readable_writable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, b"hello").unwrap();

        let target = FuzzTarget::probe(path.clone());
        assert_eq!(target.path(), path.as_path());
        assert!(target.can_read());
        assert!(target.can_write());
    }

    #[test]
    fn test_probe_missing_file() {
        let target = FuzzTarget::probe(PathBuf::from("/definitely/not/here"));
        assert!(!target.can_read());
        assert!(!target.can_write());
    }
}
