//! Tree comparison and line statistics
//!
//! - `tree_diff`: Tree-level diffing for detecting which files changed
//! - `diff_stat`: Inserted/deleted line counts over the changed files

pub mod diff_stat;
pub mod tree_diff;
