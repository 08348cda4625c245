//! Line statistics for a set of file changes
//!
//! Counts follow `git diff --numstat` for text files: a line present only in
//! the new content is an insertion, one present only in the old content is a
//! deletion. Content containing a NUL byte is treated as binary and counted
//! as zero lines.

use serde::Serialize;
use similar::{Algorithm, ChangeTag, TextDiff};
use std::ops::AddAssign;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DiffStat {
    pub insertions: usize,
    pub deletions: usize,
}

impl DiffStat {
    /// Line counts for one file going from `old` to `new`
    pub fn between(old: &[u8], new: &[u8]) -> Self {
        if is_binary(old) || is_binary(new) {
            return DiffStat::default();
        }

        let old = String::from_utf8_lossy(old);
        let new = String::from_utf8_lossy(new);
        let diff = TextDiff::configure()
            .algorithm(Algorithm::Myers)
            .diff_lines(&*old, &*new);

        diff.iter_all_changes()
            .fold(DiffStat::default(), |mut stat, change| {
                match change.tag() {
                    ChangeTag::Insert => stat.insertions += 1,
                    ChangeTag::Delete => stat.deletions += 1,
                    ChangeTag::Equal => {}
                }
                stat
            })
    }
}

impl AddAssign for DiffStat {
    fn add_assign(&mut self, other: Self) {
        self.insertions += other.insertions;
        self.deletions += other.deletions;
    }
}

fn is_binary(content: &[u8]) -> bool {
    content.contains(&0)
}
