use super::{FileKind, Filesystem};
use anyhow::{Result, anyhow};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// In-memory [`Filesystem`] fake.
///
/// Parents of added entries become directories automatically. `list`
/// returns children in lexicographic order, which keeps tests that
/// depend on membership deterministic without promising any ordering
/// contract to callers.
#[derive(Debug, Default)]
pub struct MemoryFilesystem {
    files: BTreeMap<PathBuf, Vec<u8>>,
    dirs: BTreeSet<PathBuf>,
    cwd: PathBuf,
}

impl MemoryFilesystem {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut dirs = BTreeSet::new();
        dirs.insert(root.clone());
        Self {
            files: BTreeMap::new(),
            dirs,
            cwd: root,
        }
    }

    pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let path = path.into();
        self.add_parents(&path);
        self.files.insert(path, contents.into());
    }

    pub fn add_dir(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        self.add_parents(&path);
        self.dirs.insert(path);
    }

    fn add_parents(&mut self, path: &Path) {
        let mut current = path.parent();
        while let Some(dir) = current {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.dirs.insert(dir.to_path_buf());
            current = dir.parent();
        }
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.dirs.contains(path)
    }

    fn metadata(&self, path: &Path) -> Option<FileKind> {
        if self.files.contains_key(path) {
            Some(FileKind {
                is_file: true,
                is_dir: false,
                is_symlink: false,
            })
        } else if self.dirs.contains(path) {
            Some(FileKind {
                is_file: false,
                is_dir: true,
                is_symlink: false,
            })
        } else {
            None
        }
    }

    fn read_bytes(&self, path: &Path) -> Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("No such file: {}", path.display()))
    }

    fn list(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !self.dirs.contains(dir) {
            return Err(anyhow!("No such directory: {}", dir.display()));
        }
        let children: BTreeSet<PathBuf> = self
            .files
            .keys()
            .chain(self.dirs.iter())
            .filter(|path| path.parent() == Some(dir))
            .cloned()
            .collect();
        Ok(children.into_iter().collect())
    }

    fn canonicalize(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }

    fn working_directory(&self) -> PathBuf {
        self.cwd.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_a_file_creates_parent_directories() {
        let mut fsys = MemoryFilesystem::new("/project");
        fsys.add_file("/project/a/b/c.txt", "contents");

        assert!(fsys.exists(Path::new("/project/a")));
        assert!(fsys.exists(Path::new("/project/a/b")));
        assert!(fsys.metadata(Path::new("/project/a")).unwrap().is_dir);
        assert!(fsys.metadata(Path::new("/project/a/b/c.txt")).unwrap().is_file);
    }

    #[test]
    fn list_returns_only_direct_children() {
        let mut fsys = MemoryFilesystem::new("/project");
        fsys.add_file("/project/top.txt", "");
        fsys.add_file("/project/sub/nested.txt", "");

        let children = fsys.list(Path::new("/project")).unwrap();
        assert_eq!(
            children,
            vec![PathBuf::from("/project/sub"), PathBuf::from("/project/top.txt")]
        );
    }

    #[test]
    fn missing_paths_error() {
        let fsys = MemoryFilesystem::new("/project");
        assert!(fsys.read_bytes(Path::new("/project/none")).is_err());
        assert!(fsys.list(Path::new("/project/none")).is_err());
        assert!(fsys.metadata(Path::new("/project/none")).is_none());
    }
}
