//! The hierarchical ignore oracle.

use super::level::IgnoreLevel;
use super::pattern::{Pattern, PatternSource};
use crate::fsys::Filesystem;
use crate::utils::relative_slash;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of an ignore query.
#[derive(Debug, Clone)]
pub struct IgnoreResult {
    pub is_ignored: bool,
    /// The pattern that decided the outcome, when one matched.
    pub matched_pattern: Option<Rc<Pattern>>,
    /// The level the decision was taken at.
    pub level: Option<Rc<IgnoreLevel>>,
}

impl IgnoreResult {
    fn clean() -> Self {
        Self {
            is_ignored: false,
            matched_pattern: None,
            level: None,
        }
    }
}

/// Hierarchical gitignore engine for one project root.
///
/// Composes `.git/info/exclude`, the root `.gitignore`, nested
/// `.gitignore` files along the ancestry chain, and caller-supplied
/// patterns. Levels are computed lazily, one per directory, and memoized
/// until [`clear_cache`](Self::clear_cache). An engine instance belongs
/// to a single logical task; the cache is not thread-safe.
pub struct IgnoreEngine {
    fs: Arc<dyn Filesystem>,
    root: PathBuf,
    additional: Vec<String>,
    ignore_gitignore: bool,
    levels: RefCell<HashMap<PathBuf, Rc<IgnoreLevel>>>,
}

impl IgnoreEngine {
    #[must_use]
    pub fn new(
        fs: Arc<dyn Filesystem>,
        root: PathBuf,
        additional: Vec<String>,
        ignore_gitignore: bool,
    ) -> Self {
        Self {
            fs,
            root,
            additional,
            ignore_gitignore,
            levels: RefCell::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn fs(&self) -> &Arc<dyn Filesystem> {
        &self.fs
    }

    /// Drop all memoized levels. Queries afterwards re-read the ignore
    /// files from the filesystem.
    pub fn clear_cache(&self) {
        self.levels.borrow_mut().clear();
    }

    /// Decide whether `path` is ignored, consulting the filesystem for
    /// its file type. Missing metadata is treated as a non-directory.
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> IgnoreResult {
        let is_directory = self.fs.metadata(path).is_some_and(|kind| kind.is_dir);
        self.is_ignored_with(path, is_directory)
    }

    /// Ignore decision when the caller already knows the file type.
    #[must_use]
    pub fn is_ignored_with(&self, path: &Path, is_directory: bool) -> IgnoreResult {
        let Some(relative) = relative_slash(path, &self.root) else {
            return IgnoreResult::clean();
        };
        if relative.is_empty() {
            return IgnoreResult::clean();
        }
        let parent = path
            .parent()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        // A child of an ignored directory stays ignored no matter what
        // negations say about the child itself: an excluded directory is
        // never descended into, so nothing below it can be re-included.
        // The check recurses so shadowing reaches any depth.
        if parent != self.root {
            let parent_result = self.is_ignored_with(&parent, true);
            if parent_result.is_ignored {
                return IgnoreResult {
                    is_ignored: true,
                    matched_pattern: parent_result.matched_pattern,
                    level: parent_result.level,
                };
            }
        }

        let level = self.level_for(&parent);
        let (is_ignored, matched_pattern) = level.is_ignored(&relative, is_directory);
        IgnoreResult {
            is_ignored,
            matched_pattern,
            level: Some(level),
        }
    }

    /// The memoized pattern level effective inside `dir`.
    #[must_use]
    pub fn level_for(&self, dir: &Path) -> Rc<IgnoreLevel> {
        if let Some(level) = self.levels.borrow().get(dir) {
            return Rc::clone(level);
        }
        let level = Rc::new(self.build_level(dir));
        self.levels
            .borrow_mut()
            .insert(dir.to_path_buf(), Rc::clone(&level));
        level
    }

    fn build_level(&self, dir: &Path) -> IgnoreLevel {
        if dir == self.root || !dir.starts_with(&self.root) {
            return IgnoreLevel::root(self.root_patterns());
        }
        let parent = dir
            .parent()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);
        let parent_level = self.level_for(&parent);
        let relative = relative_slash(dir, &self.root).unwrap_or_default();
        let local = if self.ignore_gitignore {
            Vec::new()
        } else {
            self.parse_gitignore(&dir.join(".gitignore"), &relative)
        };
        IgnoreLevel::child(parent_level, relative, local)
    }

    /// The root pattern stack: `.git/info/exclude`, then the root
    /// `.gitignore` (unless gitignore files are disabled), then the
    /// caller-supplied patterns.
    fn root_patterns(&self) -> Vec<Rc<Pattern>> {
        let mut patterns = Vec::new();

        let exclude = self.root.join(".git").join("info").join("exclude");
        patterns.extend(self.parse_file(&exclude, PatternSource::Exclude(exclude.clone()), ""));

        if !self.ignore_gitignore {
            patterns.extend(self.parse_gitignore(&self.root.join(".gitignore"), ""));
        }

        for (index, raw) in self.additional.iter().enumerate() {
            if let Some(pattern) =
                Pattern::compile(raw, PatternSource::Additional, index + 1, "")
            {
                patterns.push(Rc::new(pattern));
            }
        }
        patterns
    }

    fn parse_gitignore(&self, path: &Path, base_dir: &str) -> Vec<Rc<Pattern>> {
        self.parse_file(path, PatternSource::GitIgnore(path.to_path_buf()), base_dir)
    }

    fn parse_file(
        &self,
        path: &Path,
        source: PatternSource,
        base_dir: &str,
    ) -> Vec<Rc<Pattern>> {
        if !self.fs.exists(path) {
            return Vec::new();
        }
        let bytes = match self.fs.read_bytes(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read ignore file");
                return Vec::new();
            }
        };
        let contents = String::from_utf8_lossy(&bytes);
        let patterns: Vec<Rc<Pattern>> = contents
            .lines()
            .enumerate()
            .filter_map(|(index, line)| {
                Pattern::compile(line, source.clone(), index + 1, base_dir)
            })
            .map(Rc::new)
            .collect();
        debug!(path = %path.display(), count = patterns.len(), "parsed ignore file");
        patterns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsys::MemoryFilesystem;

    fn engine_with(
        build: impl FnOnce(&mut MemoryFilesystem),
        additional: Vec<String>,
        ignore_gitignore: bool,
    ) -> IgnoreEngine {
        let mut fs = MemoryFilesystem::new("/project");
        build(&mut fs);
        IgnoreEngine::new(
            Arc::new(fs),
            PathBuf::from("/project"),
            additional,
            ignore_gitignore,
        )
    }

    #[test]
    fn root_gitignore_applies_everywhere() {
        let engine = engine_with(
            |fs| {
                fs.add_file("/project/.gitignore", "*.log\n");
                fs.add_file("/project/app.log", "");
                fs.add_file("/project/deep/nested/app.log", "");
                fs.add_file("/project/app.txt", "");
            },
            Vec::new(),
            false,
        );

        assert!(engine.is_ignored(Path::new("/project/app.log")).is_ignored);
        assert!(
            engine
                .is_ignored(Path::new("/project/deep/nested/app.log"))
                .is_ignored
        );
        assert!(!engine.is_ignored(Path::new("/project/app.txt")).is_ignored);
    }

    #[test]
    fn nested_gitignore_is_relative_to_its_directory() {
        let engine = engine_with(
            |fs| {
                fs.add_file("/project/src/.gitignore", "sub/secret.txt\n");
                fs.add_file("/project/src/sub/secret.txt", "");
                fs.add_file("/project/sub/secret.txt", "");
                fs.add_file("/project/other/sub/secret.txt", "");
            },
            Vec::new(),
            false,
        );

        assert!(
            engine
                .is_ignored(Path::new("/project/src/sub/secret.txt"))
                .is_ignored
        );
        assert!(
            !engine
                .is_ignored(Path::new("/project/sub/secret.txt"))
                .is_ignored
        );
        assert!(
            !engine
                .is_ignored(Path::new("/project/other/sub/secret.txt"))
                .is_ignored
        );
    }

    #[test]
    fn negation_cannot_rescue_children_of_an_ignored_directory() {
        let engine = engine_with(
            |fs| {
                fs.add_file("/project/.gitignore", "logs/\n!logs/important.log\n");
                fs.add_file("/project/logs/important.log", "");
                fs.add_file("/project/logs/other.log", "");
            },
            Vec::new(),
            false,
        );

        assert!(engine.is_ignored(Path::new("/project/logs")).is_ignored);
        assert!(
            engine
                .is_ignored(Path::new("/project/logs/other.log"))
                .is_ignored
        );
        let result = engine.is_ignored(Path::new("/project/logs/important.log"));
        assert!(result.is_ignored);
        // The decision is the parent's pattern, not the negation.
        assert_eq!(result.matched_pattern.unwrap().text, "logs");
    }

    #[test]
    fn parent_shadow_reaches_arbitrary_depth() {
        let engine = engine_with(
            |fs| {
                fs.add_file("/project/.gitignore", "logs/\n!logs/deep/nested/file.txt\n");
                fs.add_file("/project/logs/deep/nested/file.txt", "");
            },
            Vec::new(),
            false,
        );

        for path in [
            "/project/logs/deep",
            "/project/logs/deep/nested",
            "/project/logs/deep/nested/file.txt",
        ] {
            let result = engine.is_ignored(Path::new(path));
            assert!(result.is_ignored, "{path} should be shadowed");
            assert_eq!(result.matched_pattern.unwrap().text, "logs");
        }
    }

    #[test]
    fn exclude_file_contributes_to_the_root_stack() {
        let engine = engine_with(
            |fs| {
                fs.add_file("/project/.git/info/exclude", "scratch/\n");
                fs.add_dir("/project/scratch");
            },
            Vec::new(),
            false,
        );

        assert!(engine.is_ignored(Path::new("/project/scratch")).is_ignored);
    }

    #[test]
    fn additional_patterns_come_after_gitignore_and_win() {
        let engine = engine_with(
            |fs| {
                fs.add_file("/project/.gitignore", "vendored/\n");
                fs.add_dir("/project/vendored");
            },
            vec!["!vendored/".to_string()],
            false,
        );

        assert!(!engine.is_ignored(Path::new("/project/vendored")).is_ignored);
    }

    #[test]
    fn gitignore_files_can_be_disabled() {
        let engine = engine_with(
            |fs| {
                fs.add_file("/project/.gitignore", "*.log\n");
                fs.add_file("/project/sub/.gitignore", "nested.txt\n");
                fs.add_file("/project/app.log", "");
                fs.add_file("/project/sub/nested.txt", "");
                fs.add_dir("/project/custom");
            },
            vec!["custom".to_string()],
            true,
        );

        assert!(!engine.is_ignored(Path::new("/project/app.log")).is_ignored);
        assert!(
            !engine
                .is_ignored(Path::new("/project/sub/nested.txt"))
                .is_ignored
        );
        // Caller-supplied patterns still apply.
        assert!(engine.is_ignored(Path::new("/project/custom")).is_ignored);
    }

    #[test]
    fn queries_are_stable_across_cache_clears() {
        let engine = engine_with(
            |fs| {
                fs.add_file("/project/.gitignore", "a/**/b\n");
                fs.add_file("/project/a/x/b", "");
                fs.add_file("/project/a/c", "");
            },
            Vec::new(),
            false,
        );

        let before = engine.is_ignored(Path::new("/project/a/x/b")).is_ignored;
        let clean_before = engine.is_ignored(Path::new("/project/a/c")).is_ignored;
        engine.clear_cache();
        let after = engine.is_ignored(Path::new("/project/a/x/b")).is_ignored;
        let clean_after = engine.is_ignored(Path::new("/project/a/c")).is_ignored;

        assert!(before && after);
        assert!(!clean_before && !clean_after);
    }

    #[test]
    fn paths_outside_the_root_are_never_ignored() {
        let engine = engine_with(|_| {}, vec!["*".to_string()], false);
        assert!(!engine.is_ignored(Path::new("/elsewhere/file")).is_ignored);
        assert!(!engine.is_ignored(Path::new("/project")).is_ignored);
    }
}
