//! Golden-file helpers: each test case is a set of files sharing a stem,
//! one input and any number of expected outputs.

use bstr::ByteSlice;
use std::env;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

macro_rules! impl_conversions {
    ($T:ty) => {
        impl<P: Into<PathBuf>> From<P> for $T {
            fn from(path: P) -> Self {
                Self { path: path.into() }
            }
        }

        impl AsRef<Path> for $T {
            fn as_ref(&self) -> &Path {
                &self.path
            }
        }
    };
}

/// Stems of every file under `dir` whose name ends with `suffix`, sorted.
pub fn test_stems(dir: impl AsRef<Path>, suffix: &str) -> Vec<PathBuf> {
    let mut stems = Vec::new();
    for entry in WalkDir::new(dir.as_ref()).sort_by_file_name() {
        let entry = entry.unwrap_or_else(|e| panic!("Error walking {}: {}", dir.as_ref().display(), e));
        let path = entry.path();
        if let Some(stem) = path.to_str().and_then(|p| p.strip_suffix(suffix)) {
            stems.push(PathBuf::from(stem));
        }
    }
    stems
}

/// `stem` followed by `suffix`, e.g. `tests/parse/add` + `.sexp.txt`.
pub fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut path = stem.as_os_str().to_owned();
    path.push(suffix);
    PathBuf::from(path)
}

#[derive(Debug, Clone)]
pub struct InputFile {
    pub path: PathBuf,
}

impl_conversions!(InputFile);

impl InputFile {
    pub fn read_bytes(&self) -> Vec<u8> {
        std::fs::read(self)
            .unwrap_or_else(|e| panic!("Error reading {}: {}", self.path.display(), e))
    }
}

#[derive(Debug, Clone)]
pub struct OutputFile {
    pub path: PathBuf,
}

impl_conversions!(OutputFile);

impl OutputFile {
    /// `None` means the snapshot file must not exist.
    pub fn compare_opt_with_mode<T: Snapshot>(&self, actual: &Option<T>, mode: SnapshotMode) {
        let expected = self.read_bytes_opt();
        match (actual, &expected) {
            (Some(actual), Some(expected)) => {
                if actual.compare_with(expected) {
                    return;
                }
                if mode == SnapshotMode::All {
                    self.write(actual);
                } else {
                    actual.on_diff(expected);
                }
            }
            (Some(actual), None) => {
                if mode >= SnapshotMode::New {
                    self.write(actual);
                } else {
                    panic!(
                        "Snapshot {} not found\n\nUse UPDATE_SNAPSHOTS=true to generate the snapshot",
                        self.path.display()
                    );
                }
            }
            (None, Some(_)) => {
                if mode == SnapshotMode::All {
                    std::fs::remove_file(&self.path).unwrap_or_else(|e| {
                        panic!("Error removing {}: {}", self.path.display(), e);
                    });
                } else {
                    panic!(
                        "Snapshot {} should not exist\n\nUse UPDATE_SNAPSHOTS=true to remove the unnecessary snapshot",
                        self.path.display()
                    );
                }
            }
            (None, None) => {}
        }
    }

    pub fn compare_opt<T: Snapshot>(&self, actual: &Option<T>) {
        self.compare_opt_with_mode(actual, SnapshotMode::current());
    }

    fn write<T: Snapshot>(&self, actual: &T) {
        std::fs::write(self, actual.to_snapshot())
            .unwrap_or_else(|e| panic!("Error writing {}: {}", self.path.display(), e));
    }

    fn read_bytes_opt(&self) -> Option<Vec<u8>> {
        match std::fs::read(self) {
            Ok(expected) => Some(expected),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => panic!("Error reading {}: {}", self.path.display(), e),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SnapshotMode {
    None,
    New,
    All,
}

impl SnapshotMode {
    pub fn current() -> SnapshotMode {
        let update_snapshots = env::var("UPDATE_SNAPSHOTS").unwrap_or_default();
        let ci = env::var("CI").unwrap_or_default();
        match &update_snapshots[..] {
            "all" | "true" | "1" => return SnapshotMode::All,
            "new" => return SnapshotMode::New,
            "none" | "false" | "0" => return SnapshotMode::None,
            _ => {}
        }
        if ci == "true" || ci == "1" {
            return SnapshotMode::None;
        }
        SnapshotMode::New
    }
}

pub trait Snapshot {
    fn to_snapshot(&self) -> Vec<u8>;
    fn compare_with(&self, snapshot: &[u8]) -> bool;
    fn on_diff(&self, snapshot: &[u8]) -> !;
}

impl Snapshot for String {
    fn to_snapshot(&self) -> Vec<u8> {
        self.as_bytes().to_owned()
    }
    fn compare_with(&self, snapshot: &[u8]) -> bool {
        self.as_bytes() == snapshot
    }
    fn on_diff(&self, snapshot: &[u8]) -> ! {
        assert_eq!(self, snapshot.as_bstr());
        unreachable!();
    }
}
