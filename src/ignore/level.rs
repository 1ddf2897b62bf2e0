//! Per-directory pattern lists.

use super::pattern::Pattern;
use std::rc::Rc;

/// The cumulative pattern list effective inside one directory.
///
/// A level stores only the patterns parsed at its own directory plus a
/// link to its parent level; the effective list is the parent's list
/// followed by the local ones. Matching scans the local patterns in
/// reverse and then defers upward, which evaluates exactly
/// last-match-wins over the concatenated list without copying patterns
/// into every descendant.
#[derive(Debug)]
pub struct IgnoreLevel {
    parent: Option<Rc<IgnoreLevel>>,
    local: Vec<Rc<Pattern>>,
    /// Root-relative directory this level describes; empty for the root.
    pub dir: String,
}

impl IgnoreLevel {
    pub(crate) fn root(local: Vec<Rc<Pattern>>) -> Self {
        Self {
            parent: None,
            local,
            dir: String::new(),
        }
    }

    pub(crate) fn child(parent: Rc<IgnoreLevel>, dir: String, local: Vec<Rc<Pattern>>) -> Self {
        Self {
            parent: Some(parent),
            local,
            dir,
        }
    }

    /// Decide whether `relative` is ignored at this level. The last
    /// matching pattern wins; no match anywhere means not ignored.
    #[must_use]
    pub fn is_ignored(&self, relative: &str, is_directory: bool) -> (bool, Option<Rc<Pattern>>) {
        for pattern in self.local.iter().rev() {
            if pattern.matches(relative, is_directory) {
                return (!pattern.is_negation, Some(Rc::clone(pattern)));
            }
        }
        match &self.parent {
            Some(parent) => parent.is_ignored(relative, is_directory),
            None => (false, None),
        }
    }

    /// Number of patterns effective at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.local.len() + self.parent.as_ref().map_or(0, |parent| parent.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Effective patterns in evaluation order, parent levels first.
    #[must_use]
    pub fn patterns(&self) -> Vec<Rc<Pattern>> {
        let mut all = self
            .parent
            .as_ref()
            .map_or_else(Vec::new, |parent| parent.patterns());
        all.extend(self.local.iter().map(Rc::clone));
        all
    }
}
