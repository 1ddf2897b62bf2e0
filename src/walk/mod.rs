//! Streaming, gitignore-aware filesystem traversal.
//!
//! [`Walk`] is a pull-based depth-first iterator: nothing is listed or
//! stat-ed until the consumer asks for the next entry, and dropping the
//! iterator stops the walk. Ignored directories are emitted once and
//! never descended into, which is what makes the parent-shadow rule
//! observable and keeps large excluded trees cheap.

use crate::ignore::{IgnoreEngine, IgnoreResult};
use crate::utils::relative_slash;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// One traversed filesystem entry with its ignore verdict.
#[derive(Debug, Clone)]
pub struct FilesystemEntry {
    pub path: PathBuf,
    /// Root-relative forward-slash path.
    pub relative: String,
    pub is_directory: bool,
    pub ignore: IgnoreResult,
}

/// Depth-first lazy walk over an engine's root directory.
///
/// Child order inside a directory follows whatever the filesystem's
/// `list` returns; each directory's children are contiguous in the
/// output.
pub struct Walk<'a> {
    engine: &'a IgnoreEngine,
    pending: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
}

impl<'a> Walk<'a> {
    #[must_use]
    pub fn new(engine: &'a IgnoreEngine) -> Self {
        let root = engine.root().to_path_buf();
        let mut walk = Self {
            engine,
            pending: Vec::new(),
            visited: HashSet::new(),
        };
        walk.visited.insert(engine.fs().canonicalize(&root));
        walk.push_children(&root);
        walk
    }

    /// Non-ignored, non-directory entries, in traversal order.
    pub fn tracked_files(self) -> impl Iterator<Item = FilesystemEntry> + 'a {
        self.filter(|entry| !entry.is_directory && !entry.ignore.is_ignored)
    }

    /// Every entry the engine ignores, directories included.
    pub fn ignored_files(self) -> impl Iterator<Item = FilesystemEntry> + 'a {
        self.filter(|entry| entry.ignore.is_ignored)
    }

    fn push_children(&mut self, dir: &Path) {
        match self.engine.fs().list(dir) {
            Ok(children) => {
                // LIFO stack: reversed so the first listed child pops first.
                self.pending.extend(children.into_iter().rev());
            }
            Err(err) => {
                warn!(dir = %dir.display(), %err, "cannot list directory, treating as empty");
            }
        }
    }
}

impl Iterator for Walk<'_> {
    type Item = FilesystemEntry;

    fn next(&mut self) -> Option<FilesystemEntry> {
        let path = self.pending.pop()?;
        let is_directory = self
            .engine
            .fs()
            .metadata(&path)
            .is_some_and(|kind| kind.is_dir);
        let ignore = self.engine.is_ignored_with(&path, is_directory);
        let relative = relative_slash(&path, self.engine.root()).unwrap_or_default();

        if is_directory && !ignore.is_ignored {
            let canonical = self.engine.fs().canonicalize(&path);
            // Refuse to re-enter a directory seen earlier in this walk
            // (symlink loops resolve to an already-visited path).
            if self.visited.insert(canonical) {
                self.push_children(&path);
            }
        }

        Some(FilesystemEntry {
            path,
            relative,
            is_directory,
            ignore,
        })
    }
}
