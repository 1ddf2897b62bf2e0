use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// On-disk project fixture for integration tests.
pub struct TestProject {
    pub temp: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Write a file under the project, creating parent directories.
    pub fn write(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        let path = self.temp.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// A minimal valid manifest body.
    #[must_use]
    pub fn manifest(name: &str) -> String {
        format!(r#"{{"name": "{name}", "version": "1.0.0", "author": "tester"}}"#)
    }
}
