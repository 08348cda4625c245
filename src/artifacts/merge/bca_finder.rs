//! Best common ancestor finder
//!
//! Computes the merge base of two commits: the set of common ancestors that
//! are not themselves ancestors of another common ancestor.
//!
//! ## Algorithm Overview
//!
//! ### Phase 1: Paint down to the common commits
//!
//! Both commits are pushed on a priority queue ordered by committer timestamp
//! (newest first) and painted with the side they were reached from. Parents
//! inherit the paint of their children. A commit painted from both sides is a
//! candidate; its ancestors are painted `STALE` because anything below a
//! candidate is an older common ancestor. The walk ends as soon as every
//! queued commit is stale, so the work done is bounded by the part of the
//! history above the merge base rather than by the size of the repository.
//!
//! ### Phase 2: Drop redundant candidates
//!
//! Criss-cross histories can leave several candidates. For each candidate the
//! painting walk is repeated against the remaining ones; a candidate reached
//! from another candidate is an ancestor of it and is discarded.
//!
//! The result is sorted by id so that `merge_bases(a, b) == merge_bases(b, a)`.
//! An empty result means the histories are unrelated.
//!
//! ## Debug Logging
//!
//! Building with the `debug_merge` feature emits a `trace` event for every
//! processed commit and for the candidates of each phase.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

/// Graph walk tracing, compiled in with the `debug_merge` feature
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            tracing::trace!($($arg)*);
        }
    };
}

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b0000;
        const VISITED_FROM_SOURCE = 0b0001;
        const VISITED_FROM_TARGET = 0b0010;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_SOURCE.bits() | Self::VISITED_FROM_TARGET.bits();
        const STALE = 0b0100;
        const RESULT = 0b1000;
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (VisitState::VISITED_FROM_SOURCE, "SOURCE"),
            (VisitState::VISITED_FROM_TARGET, "TARGET"),
            (VisitState::STALE, "STALE"),
            (VisitState::RESULT, "RESULT"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect::<Vec<_>>();

        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// Paint states produced by one walk, plus the candidates it found in discovery order
struct Painting {
    states: HashMap<ObjectId, VisitState>,
    candidates: Vec<ObjectId>,
}

impl Painting {
    fn state(&self, oid: &ObjectId) -> VisitState {
        self.states.get(oid).copied().unwrap_or(VisitState::NONE)
    }
}

/// Finds the best common ancestors of two commits
///
/// # Type Parameters
///
/// * `CommitLoaderFn` - loads the parents and timestamp of a commit. Loader
///   errors abort the search and are returned unchanged.
#[derive(Debug, Clone)]
pub struct BCAFinder<CommitLoaderFn> {
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn, E> BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit, E>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// All best common ancestors of `source` and `target`, sorted by id
    ///
    /// # Examples
    ///
    /// ```text
    /// A <- B <- C            merge_bases(B, C) == [B]
    ///
    ///     A
    ///    / \                 merge_bases(B, C) == [A]
    ///   B   C
    ///
    ///     A
    ///    / \
    ///   B   C
    ///   |\ /|                merge_bases(F, G) == [B, C]
    ///   | X |
    ///   |/ \|
    ///   D   E
    ///   |   |
    ///   F   G
    /// ```
    pub fn merge_bases(&self, source: &ObjectId, target: &ObjectId) -> Result<Vec<ObjectId>, E> {
        if source == target {
            return Ok(vec![source.clone()]);
        }

        let candidates = self
            .paint_down_to_common(source, std::slice::from_ref(target))?
            .candidates;
        debug_log!(?candidates, "merge base candidates");

        let mut best = self.remove_redundant(candidates)?;
        best.sort();
        debug_log!(?best, "best common ancestors");

        Ok(best)
    }

    fn paint_down_to_common(
        &self,
        source: &ObjectId,
        targets: &[ObjectId],
    ) -> Result<Painting, E> {
        let mut states = HashMap::<ObjectId, VisitState>::new();
        let mut candidates = Vec::new();
        let mut queue = BinaryHeap::new();

        let source_commit = (self.commit_loader)(source)?;
        states.insert(source.clone(), VisitState::VISITED_FROM_SOURCE);
        queue.push((source_commit.timestamp, source.clone()));

        for target in targets {
            let target_commit = (self.commit_loader)(target)?;
            *states.entry(target.clone()).or_insert(VisitState::NONE) |=
                VisitState::VISITED_FROM_TARGET;
            queue.push((target_commit.timestamp, target.clone()));
        }

        while Self::has_non_stale(&queue, &states) {
            let Some((_, commit_id)) = queue.pop() else {
                break;
            };

            let current_state = states.get(&commit_id).copied().unwrap_or(VisitState::NONE);
            debug_log!(commit = %commit_id, state = ?current_state, "processing commit");

            let mut inherited =
                current_state & (VisitState::VISITED_FROM_BOTH | VisitState::STALE);

            if inherited == VisitState::VISITED_FROM_BOTH {
                if !current_state.contains(VisitState::RESULT) {
                    states.insert(commit_id.clone(), current_state | VisitState::RESULT);
                    candidates.push(commit_id.clone());
                }
                inherited |= VisitState::STALE;
            }

            let current_commit = (self.commit_loader)(&commit_id)?;
            for parent_id in current_commit.parents {
                let parent_state = states.get(&parent_id).copied().unwrap_or(VisitState::NONE);
                if parent_state.contains(inherited) {
                    continue;
                }

                let parent_commit = (self.commit_loader)(&parent_id)?;
                states.insert(parent_id.clone(), parent_state | inherited);
                queue.push((parent_commit.timestamp, parent_id));
            }
        }

        // a candidate later reached through a newer candidate is an older common ancestor
        candidates.retain(|oid| {
            !states
                .get(oid)
                .is_some_and(|state| state.contains(VisitState::STALE))
        });

        Ok(Painting { states, candidates })
    }

    fn has_non_stale(
        queue: &BinaryHeap<(chrono::DateTime<chrono::FixedOffset>, ObjectId)>,
        states: &HashMap<ObjectId, VisitState>,
    ) -> bool {
        queue.iter().any(|(_, oid)| {
            !states
                .get(oid)
                .is_some_and(|state| state.contains(VisitState::STALE))
        })
    }

    fn remove_redundant(&self, candidates: Vec<ObjectId>) -> Result<Vec<ObjectId>, E> {
        if candidates.len() < 2 {
            return Ok(candidates);
        }

        let mut redundant = vec![false; candidates.len()];

        for (index, candidate) in candidates.iter().enumerate() {
            if redundant[index] {
                continue;
            }

            let others = candidates
                .iter()
                .enumerate()
                .filter(|(other_index, _)| *other_index != index && !redundant[*other_index])
                .collect::<Vec<_>>();
            if others.is_empty() {
                break;
            }

            let other_ids = others
                .iter()
                .map(|(_, oid)| (*oid).clone())
                .collect::<Vec<_>>();
            let painting = self.paint_down_to_common(candidate, &other_ids)?;

            if painting
                .state(candidate)
                .contains(VisitState::VISITED_FROM_TARGET)
            {
                redundant[index] = true;
            }
            for (other_index, other) in others {
                if painting
                    .state(other)
                    .contains(VisitState::VISITED_FROM_SOURCE)
                {
                    redundant[other_index] = true;
                }
            }
        }

        Ok(candidates
            .into_iter()
            .zip(redundant)
            .filter(|(_, redundant)| !redundant)
            .map(|(oid, _)| oid)
            .collect())
    }
}
