//! Combined revision expressions (`base...head`, `base..head`, `head`)
//!
//! Expressions split at the first separator only. Triple-dot is tried
//! before double-dot so that `a...b` is never read as `a` and `.b`. A `...`
//! expression with an empty side does not qualify as an ancestry comparison
//! and falls through to the double-dot rule. An empty side of a `..`
//! expression means the default revision. Only the empty string counts as
//! an empty expression; surrounding whitespace is kept as part of a name.

use crate::artifacts::compare::result::ComparisonMode;

const TRIPLE_DOT: &str = "...";
const DOUBLE_DOT: &str = "..";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSpec {
    pub mode: ComparisonMode,
    pub base: String,
    pub head: String,
}

impl RefSpec {
    pub fn parse(combined: &str, default_revision: &str) -> Self {
        if combined.is_empty() {
            return RefSpec::direct(default_revision, default_revision);
        }

        if let Some((base, head)) = combined.split_once(TRIPLE_DOT)
            && !base.is_empty()
            && !head.is_empty()
        {
            return RefSpec {
                mode: ComparisonMode::AncestryRange,
                base: base.to_string(),
                head: head.to_string(),
            };
        }

        if let Some((base, head)) = combined.split_once(DOUBLE_DOT) {
            let or_default = |side: &str| {
                if side.is_empty() {
                    default_revision.to_string()
                } else {
                    side.to_string()
                }
            };
            return RefSpec::direct(&or_default(base), &or_default(head));
        }

        RefSpec::direct(default_revision, combined)
    }

    fn direct(base: &str, head: &str) -> Self {
        RefSpec {
            mode: ComparisonMode::DirectDiff,
            base: base.to_string(),
            head: head.to_string(),
        }
    }
}
