//! Snapshot family discovery and ordered iteration.
//!
//! The simulator writes one file per snapshot interval, named
//! `prefix` + numeric suffix (`snap_0.0625`, `snap_0.125`, …, or `snap_1`,
//! `snap_2`, `snap_10`). Discovery orders the family by the *numeric value*
//! of the suffix, never lexicographically — `_2` sorts before `_10`.
//! Entries whose suffix fails to parse are excluded with a warning.
//!
//! Iteration comes in two forms: [`SnapshotSet::load_all`] materializes
//! every collection in order, and [`SnapshotSet::visit`] streams them one
//! at a time to a callback (for large families where holding every snapshot
//! would exhaust memory), passing the ordinal position as a display index.

use std::path::{Path, PathBuf};

use crate::error::FormatError;
use crate::stars::Stars;

/// What to do when one file of a family fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the whole pass on the first bad file.
    FailFast,
    /// Log the failure and continue with the next file. Ordinals still
    /// count skipped files so indices stay aligned with the sorted family.
    SkipAndWarn,
}

/// An ordered family of snapshot files sharing one prefix.
#[derive(Debug, Clone)]
pub struct SnapshotSet {
    paths: Vec<PathBuf>,
}

impl SnapshotSet {
    /// Scan the prefix's directory for `prefix + suffix` entries and order
    /// them by numeric suffix value. Non-numeric suffixes are skipped with
    /// a warning; a prefix matching no files yields an empty set.
    pub fn discover<P: AsRef<Path>>(prefix: P) -> Result<Self, FormatError> {
        let prefix = prefix.as_ref();
        let dir = match prefix.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = prefix
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut keyed: Vec<(f64, PathBuf)> = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(suffix) = name.strip_prefix(&stem) else {
                continue;
            };
            match suffix.parse::<f64>() {
                Ok(key) => keyed.push((key, entry.path())),
                Err(_) => {
                    log::warn!(
                        "Skipping {:?}: suffix {:?} is not numeric",
                        entry.path(),
                        suffix
                    );
                }
            }
        }

        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self {
            paths: keyed.into_iter().map(|(_, p)| p).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The family's paths in numeric-suffix order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Load every snapshot, in order. Fail-fast: the first bad file aborts.
    pub fn load_all(&self) -> Result<Vec<Stars>, FormatError> {
        self.paths.iter().map(Stars::load).collect()
    }

    /// Stream each snapshot to `f` with its ordinal position, holding at
    /// most one collection in memory at a time.
    pub fn visit<F>(&self, policy: ErrorPolicy, mut f: F) -> Result<(), FormatError>
    where
        F: FnMut(usize, Stars),
    {
        for (index, path) in self.paths.iter().enumerate() {
            match Stars::load(path) {
                Ok(stars) => f(index, stars),
                Err(e) => match policy {
                    ErrorPolicy::FailFast => return Err(e),
                    ErrorPolicy::SkipAndWarn => {
                        log::warn!("Skipping {:?}: {}", path, e);
                    }
                },
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use tempfile::TempDir;

    fn write_snap(dir: &TempDir, name: &str, n: usize) -> PathBuf {
        let mut stars = Stars::new();
        for i in 0..n {
            stars.add_star(1.0, Vec3::splat(i as f32), Vec3::ZERO);
            stars.id[i] = i as f32;
        }
        let path = dir.path().join(name);
        stars.save(&path).unwrap();
        path
    }

    #[test]
    fn orders_numerically_not_lexically() {
        let dir = TempDir::new().unwrap();
        write_snap(&dir, "snap_10", 1);
        write_snap(&dir, "snap_2", 1);
        write_snap(&dir, "snap_1", 1);

        let set = SnapshotSet::discover(dir.path().join("snap_")).unwrap();
        let names: Vec<String> = set
            .paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["snap_1", "snap_2", "snap_10"]);
    }

    #[test]
    fn fractional_suffixes_sort_by_value() {
        let dir = TempDir::new().unwrap();
        write_snap(&dir, "s0.125", 1);
        write_snap(&dir, "s0.0625", 1);
        write_snap(&dir, "s1", 1);

        let set = SnapshotSet::discover(dir.path().join("s")).unwrap();
        let names: Vec<String> = set
            .paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["s0.0625", "s0.125", "s1"]);
    }

    #[test]
    fn non_numeric_suffix_is_excluded() {
        let dir = TempDir::new().unwrap();
        write_snap(&dir, "snap_1", 1);
        std::fs::write(dir.path().join("snap_backup"), b"junk").unwrap();

        let set = SnapshotSet::discover(dir.path().join("snap_")).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn visit_passes_ordinals_in_order() {
        let dir = TempDir::new().unwrap();
        write_snap(&dir, "t3", 3);
        write_snap(&dir, "t1", 1);
        write_snap(&dir, "t2", 2);

        let set = SnapshotSet::discover(dir.path().join("t")).unwrap();
        let mut seen = Vec::new();
        set.visit(ErrorPolicy::FailFast, |i, stars| seen.push((i, stars.len())))
            .unwrap();
        assert_eq!(seen, [(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn skip_and_warn_survives_a_bad_file() {
        let dir = TempDir::new().unwrap();
        write_snap(&dir, "x1", 1);
        std::fs::write(dir.path().join("x2"), b"short").unwrap();
        write_snap(&dir, "x3", 3);

        let set = SnapshotSet::discover(dir.path().join("x")).unwrap();
        assert_eq!(set.len(), 3);

        let mut seen = Vec::new();
        set.visit(ErrorPolicy::SkipAndWarn, |i, stars| seen.push((i, stars.len())))
            .unwrap();
        assert_eq!(seen, [(0, 1), (2, 3)]);

        // Fail-fast surfaces the same corruption as an error.
        assert!(set.visit(ErrorPolicy::FailFast, |_, _| ()).is_err());
    }

    #[test]
    fn load_all_materializes_in_order() {
        let dir = TempDir::new().unwrap();
        write_snap(&dir, "m2", 2);
        write_snap(&dir, "m1", 1);

        let set = SnapshotSet::discover(dir.path().join("m")).unwrap();
        let all = set.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].len(), 1);
        assert_eq!(all[1].len(), 2);
    }
}
