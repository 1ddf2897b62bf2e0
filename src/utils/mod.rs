//! Path and time helpers shared across the crate.

use std::path::Path;

/// Root-relative, forward-slash form of `path`, the shape ignore
/// patterns match against. Returns `None` when `path` is not under
/// `root`; the root itself maps to the empty string.
#[must_use]
pub fn relative_slash(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in rel.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    Some(out)
}

/// Current time as milliseconds since the Unix epoch.
#[must_use]
pub fn epoch_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
