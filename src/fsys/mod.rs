//! Filesystem abstraction used by the ignore engine and the traverser.
//!
//! All core I/O goes through the [`Filesystem`] trait so the engine can be
//! exercised against an in-memory tree in tests. Two implementations exist:
//! [`OsFilesystem`] for the host filesystem and [`MemoryFilesystem`] as the
//! test fake. Components that need I/O take the trait at construction;
//! nothing else in the core touches the operating system.

mod memory;
mod real;

pub use memory::MemoryFilesystem;
pub use real::OsFilesystem;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// File type information returned by [`Filesystem::metadata`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileKind {
    pub is_file: bool,
    pub is_dir: bool,
    pub is_symlink: bool,
}

/// Minimal filesystem surface needed by discovery.
pub trait Filesystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// `None` when the path does not exist or its metadata cannot be read.
    fn metadata(&self, path: &Path) -> Option<FileKind>;

    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>>;

    /// Direct children of `dir`, in no specified order.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    /// Resolved absolute form of `path`; falls back to the input when
    /// resolution fails.
    fn canonicalize(&self, path: &Path) -> PathBuf;

    fn working_directory(&self) -> PathBuf;
}
