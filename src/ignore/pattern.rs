//! Compilation of single gitignore lines into matchable patterns.
//!
//! A pattern matches forward-slash, root-relative paths. Compilation
//! lowers gitignore wildcards onto a [`regex::Regex`] anchored with
//! `^...$`; escape sequences are consumed before the wildcard rules ever
//! see them, so `\*` can never be re-read as a wildcard and `**` is
//! claimed before `*`.

use regex::Regex;
use std::path::PathBuf;
use tracing::warn;

/// Where a pattern came from, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSource {
    /// A `.gitignore` file, root-level or nested.
    GitIgnore(PathBuf),
    /// The repository's `.git/info/exclude` file.
    Exclude(PathBuf),
    /// A pattern supplied directly by the caller.
    Additional,
}

/// One compiled gitignore pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// Pattern body after normalization, with the flag characters
    /// (`!` prefix, `/` suffix, leading `/`) stripped.
    pub text: String,
    pub is_negation: bool,
    pub is_directory_only: bool,
    pub is_anchored: bool,
    /// Root-relative directory of the `.gitignore` that contributed this
    /// pattern; empty for root-level, exclude-file, and additional
    /// patterns.
    pub base_dir: String,
    pub source: PatternSource,
    pub line_number: usize,
    matcher: Regex,
}

impl Pattern {
    /// Compile one line of gitignore syntax.
    ///
    /// Returns `None` for blank lines, comments, and lines that reduce to
    /// an empty pattern. Lines that produce an unparsable matcher are
    /// skipped with a warning rather than failing the caller.
    #[must_use]
    pub fn compile(
        line: &str,
        source: PatternSource,
        line_number: usize,
        base_dir: &str,
    ) -> Option<Self> {
        let mut body = normalize(line)?;

        let is_negation = if body.starts_with('!') {
            body.remove(0);
            true
        } else {
            false
        };

        let is_directory_only = if body.ends_with('/') {
            body.pop();
            true
        } else {
            false
        };

        let is_anchored = body.starts_with('/') || body.contains('/');
        if body.starts_with('/') {
            body.remove(0);
        }

        if body.is_empty() {
            return None;
        }

        let fragment = translate(&body);
        let anchored = if is_anchored {
            format!("^{fragment}$")
        } else {
            format!("^(?:.*/)?{fragment}$")
        };
        let matcher = match Regex::new(&anchored) {
            Ok(matcher) => matcher,
            Err(err) => {
                warn!(line, %err, "skipping unparsable ignore pattern");
                return None;
            }
        };

        Some(Self {
            text: body,
            is_negation,
            is_directory_only,
            is_anchored,
            base_dir: base_dir.to_string(),
            source,
            line_number,
            matcher,
        })
    }

    /// Test a root-relative, forward-slash path against this pattern.
    ///
    /// A pattern from a nested `.gitignore` only applies below its base
    /// directory, and matches against the path remainder inside it.
    #[must_use]
    pub fn matches(&self, relative: &str, is_directory: bool) -> bool {
        if self.is_directory_only && !is_directory {
            return false;
        }
        let target = if self.base_dir.is_empty() {
            relative
        } else if relative == self.base_dir {
            ""
        } else if let Some(rest) = relative
            .strip_prefix(self.base_dir.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
        {
            rest
        } else {
            return false;
        };
        self.matcher.is_match(target)
    }
}

/// Apply the line-level normalization: comment and blank handling plus
/// trailing-whitespace rules. `None` means the line carries no pattern.
fn normalize(line: &str) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    if line.trim_start().starts_with('#') {
        return None;
    }
    Some(strip_trailing_whitespace(line))
}

/// Unescaped trailing spaces are stripped; each trailing `\<space>`
/// keeps exactly one literal space.
fn strip_trailing_whitespace(line: &str) -> String {
    let mut chars: Vec<char> = line.chars().collect();
    let mut kept_spaces = 0;
    while chars.last() == Some(&' ') {
        let preceding_backslashes = chars[..chars.len() - 1]
            .iter()
            .rev()
            .take_while(|&&c| c == '\\')
            .count();
        if preceding_backslashes % 2 == 1 {
            // Escaped space: drop the escape, remember the space.
            chars.truncate(chars.len() - 2);
            kept_spaces += 1;
        } else {
            chars.pop();
        }
    }
    let mut out: String = chars.into_iter().collect();
    for _ in 0..kept_spaces {
        out.push(' ');
    }
    out
}

/// Lower a normalized pattern body onto a regex fragment.
fn translate(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut out = String::with_capacity(body.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                push_literal(&mut out, chars[i + 1]);
                i += 2;
            }
            '*' => {
                let run = chars[i..].iter().take_while(|&&c| c == '*').count();
                if run >= 2 {
                    let at_start = i == 0;
                    let after_slash = i > 0 && chars[i - 1] == '/';
                    let next = chars.get(i + run).copied();
                    if at_start && next == Some('/') {
                        // `**/` leading: any directory prefix, or none.
                        out.push_str("(?:.*/)?");
                        i += run + 1;
                    } else if after_slash && next == Some('/') {
                        // `/**/` between components: zero or more levels.
                        out.push_str("(?:[^/]+/)*");
                        i += run + 1;
                    } else {
                        // Trailing `/**` and free-standing `**`.
                        out.push_str(".*");
                        i += run;
                    }
                } else {
                    out.push_str("[^/]*");
                    i += 1;
                }
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            '[' => i = translate_class(&chars, i, &mut out),
            c => {
                push_literal(&mut out, c);
                i += 1;
            }
        }
    }
    out
}

/// Copy a `[...]` character class through, converting the gitignore
/// negation marker to the regex one. An unterminated class degrades to a
/// literal `[`.
fn translate_class(chars: &[char], open: usize, out: &mut String) -> usize {
    let mut class = String::from("[");
    let mut i = open + 1;
    if matches!(chars.get(i).copied(), Some('!' | '^')) {
        class.push('^');
        i += 1;
    }
    let mut closed = false;
    while i < chars.len() {
        let c = chars[i];
        class.push(c);
        i += 1;
        if c == '\\' && i < chars.len() {
            class.push(chars[i]);
            i += 1;
        } else if c == ']' {
            closed = true;
            break;
        }
    }
    if closed {
        out.push_str(&class);
        i
    } else {
        out.push_str("\\[");
        open + 1
    }
}

fn push_literal(out: &mut String, c: char) {
    if "\\.^$()[]{}|+*?".contains(c) {
        out.push('\\');
    }
    out.push(c);
}
