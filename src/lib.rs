pub mod cli;
pub mod commands;
pub mod fsys;
pub mod ignore;
pub mod manifest;
pub mod state;
pub mod utils;
pub mod walk;

use anyhow::Result;
use fsys::{Filesystem, OsFilesystem};
use std::path::PathBuf;
use std::sync::Arc;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the project state file; the directory holding it is the
/// project root.
pub const STATE_FILE: &str = ".bmt.json";

/// Resolved project environment shared by all commands.
pub struct ProjectContext {
    pub root: PathBuf,
    pub state_path: PathBuf,
    pub fs: Arc<dyn Filesystem>,
}

impl std::fmt::Debug for ProjectContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProjectContext")
            .field("root", &self.root)
            .field("state_path", &self.state_path)
            .finish_non_exhaustive()
    }
}

impl ProjectContext {
    /// Locate the nearest project root at or above the process working
    /// directory.
    ///
    /// # Errors
    ///
    /// Fails when no ancestor directory contains a state file.
    pub fn discover() -> Result<Self> {
        let fs: Arc<dyn Filesystem> = Arc::new(OsFilesystem);
        let start = fs.working_directory();
        Self::discover_from(&start, fs)
    }

    /// Walk up from `start` looking for the state file.
    ///
    /// # Errors
    ///
    /// Fails when no ancestor directory contains a state file.
    pub fn discover_from(start: &std::path::Path, fs: Arc<dyn Filesystem>) -> Result<Self> {
        let mut dir = fs.canonicalize(start);
        loop {
            let candidate = dir.join(STATE_FILE);
            if fs.exists(&candidate) {
                return Ok(Self {
                    root: dir,
                    state_path: candidate,
                    fs,
                });
            }
            match dir.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => anyhow::bail!(
                    "Not inside a bmt project (no {STATE_FILE} found). Did you run 'bmt init'?"
                ),
            }
        }
    }

    /// Context rooted at an explicit directory, used by `init` and tests.
    #[must_use]
    pub fn at_root(root: PathBuf, fs: Arc<dyn Filesystem>) -> Self {
        let state_path = root.join(STATE_FILE);
        Self {
            root,
            state_path,
            fs,
        }
    }
}
