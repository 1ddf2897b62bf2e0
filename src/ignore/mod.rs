//! Hierarchical gitignore handling.
//!
//! Split the way the data flows: [`pattern`] compiles single gitignore
//! lines into matchable patterns, [`level`] composes the per-directory
//! pattern lists, and [`engine`] memoizes levels and answers ignore
//! queries with parent-shadow semantics.
//!
//! Matching is case-sensitive throughout. On case-insensitive
//! filesystems this diverges from git, which defers to the platform.

pub mod engine;
pub mod level;
pub mod pattern;

pub use engine::{IgnoreEngine, IgnoreResult};
pub use level::IgnoreLevel;
pub use pattern::{Pattern, PatternSource};
