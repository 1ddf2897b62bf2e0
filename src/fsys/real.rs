use super::{FileKind, Filesystem};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// [`Filesystem`] backed by the host operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn metadata(&self, path: &Path) -> Option<FileKind> {
        let link = fs::symlink_metadata(path).ok()?;
        let is_symlink = link.file_type().is_symlink();
        // For symlinks, describe the target; a broken link reports as
        // neither file nor directory.
        let meta = if is_symlink {
            fs::metadata(path).ok()
        } else {
            Some(link)
        };
        Some(FileKind {
            is_file: meta.as_ref().is_some_and(fs::Metadata::is_file),
            is_dir: meta.as_ref().is_some_and(fs::Metadata::is_dir),
            is_symlink,
        })
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to list directory {}", dir.display()))?;
        let mut children = Vec::new();
        for entry in entries {
            let entry = entry
                .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?;
            children.push(entry.path());
        }
        Ok(children)
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    fn working_directory(&self) -> PathBuf {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}
