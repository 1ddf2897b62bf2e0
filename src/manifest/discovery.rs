//! Manifest discovery over the ignore-aware walker.

use super::ModManifest;
use crate::STATE_FILE;
use crate::fsys::Filesystem;
use crate::ignore::IgnoreEngine;
use crate::utils::relative_slash;
use crate::walk::Walk;
use anyhow::Result;
use glob::Pattern as GlobPattern;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Ignore entries applied to every scan, regardless of configuration.
const BASE_IGNORES: &[&str] = &[".git/", STATE_FILE];

/// A manifest that parsed and survived the validation policy.
#[derive(Debug, Clone)]
pub struct DiscoveredManifest {
    pub path: PathBuf,
    pub manifest: ModManifest,
}

/// Discovery configuration.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Honor `.gitignore` files along the tree.
    pub respect_gitignore: bool,
    /// Extra gitignore-syntax patterns from the caller.
    pub additional_ignores: Vec<String>,
    /// Reject manifests that parse but fail validation.
    pub strict: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            respect_gitignore: true,
            additional_ignores: Vec::new(),
            strict: true,
        }
    }
}

/// Find every mod manifest under `root`.
///
/// Candidates are `*.json` files (the state file excepted); each is
/// parsed and validated, and failures only drop that candidate. Results
/// follow traversal order.
///
/// # Errors
///
/// Returns an error only when the legacy (gitignore-free) listing
/// cannot start; per-file problems never fail the scan.
pub fn discover_manifests(
    fs: &Arc<dyn Filesystem>,
    root: &Path,
    options: &DiscoveryOptions,
) -> Result<Vec<DiscoveredManifest>> {
    let mut ignores: Vec<String> = BASE_IGNORES.iter().map(ToString::to_string).collect();
    ignores.extend(options.additional_ignores.iter().cloned());

    let candidates = if options.respect_gitignore || !options.additional_ignores.is_empty() {
        gitignore_candidates(fs, root, ignores, !options.respect_gitignore)
    } else {
        legacy_candidates(fs.as_ref(), root, &ignores)?
    };
    debug!(count = candidates.len(), "manifest candidates collected");

    let strict = options.strict;
    let found: Vec<DiscoveredManifest> = candidates
        .into_par_iter()
        .filter_map(|path| {
            parse_and_validate(fs.as_ref(), &path, strict)
                .map(|manifest| DiscoveredManifest { path, manifest })
        })
        .collect();
    Ok(found)
}

/// Parse one candidate file. Any I/O, encoding, or decode problem makes
/// the candidate a `None`; in strict mode validation failures do too. In
/// lenient mode a structurally valid but semantically invalid manifest
/// is still returned.
#[must_use]
pub fn parse_and_validate(fs: &dyn Filesystem, path: &Path, strict: bool) -> Option<ModManifest> {
    let bytes = match fs.read_bytes(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            debug!(path = %path.display(), %err, "unreadable manifest candidate");
            return None;
        }
    };
    let Ok(text) = String::from_utf8(bytes) else {
        debug!(path = %path.display(), "manifest candidate is not UTF-8");
        return None;
    };
    let manifest: ModManifest = match serde_json::from_str(&text) {
        Ok(manifest) => manifest,
        Err(err) => {
            debug!(path = %path.display(), %err, "not a mod manifest");
            return None;
        }
    };
    if let Err(errors) = manifest.validate() {
        warn!(path = %path.display(), count = errors.len(), "manifest failed validation");
        if strict {
            return None;
        }
    }
    Some(manifest)
}

fn gitignore_candidates(
    fs: &Arc<dyn Filesystem>,
    root: &Path,
    patterns: Vec<String>,
    ignore_gitignore: bool,
) -> Vec<PathBuf> {
    let engine = IgnoreEngine::new(
        Arc::clone(fs),
        root.to_path_buf(),
        patterns,
        ignore_gitignore,
    );
    Walk::new(&engine)
        .tracked_files()
        .filter(|entry| is_manifest_candidate(&entry.path))
        .map(|entry| entry.path)
        .collect()
}

/// Recursive listing with the crude substring / glob ignore test. Kept
/// only for scans that disable gitignore handling without supplying
/// their own patterns; everything else goes through the hierarchical
/// engine.
fn legacy_candidates(fs: &dyn Filesystem, root: &Path, ignores: &[String]) -> Result<Vec<PathBuf>> {
    let globs: Vec<GlobPattern> = ignores
        .iter()
        .filter_map(|pattern| GlobPattern::new(pattern).ok())
        .collect();
    let mut stack = vec![root.to_path_buf()];
    let mut files = Vec::new();

    while let Some(dir) = stack.pop() {
        let children = match fs.list(&dir) {
            Ok(children) => children,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "cannot list directory, treating as empty");
                continue;
            }
        };
        for child in children {
            let relative = relative_slash(&child, root).unwrap_or_default();
            if ignores.iter().any(|entry| relative.contains(entry.as_str()))
                || globs.iter().any(|glob| glob.matches(&relative))
            {
                continue;
            }
            match fs.metadata(&child) {
                Some(kind) if kind.is_dir => stack.push(child),
                Some(kind) if kind.is_file && is_manifest_candidate(&child) => files.push(child),
                _ => {}
            }
        }
    }
    Ok(files)
}

fn is_manifest_candidate(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".json") && name != STATE_FILE)
}
