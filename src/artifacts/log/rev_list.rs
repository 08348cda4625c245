use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use chrono::{DateTime, FixedOffset};
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

/// Enumerates the commits reachable from a head but not from a boundary
///
/// Generic over the commit loader so that the walk can run against the
/// repository, an arena, or an in-memory test graph.
#[derive(Debug, Clone)]
pub struct RevList<CommitLoaderFn> {
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn, E> RevList<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit, E>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        RevList { commit_loader }
    }

    /// Commits in `boundary..head`, newest first
    ///
    /// A commit reachable from any boundary member is excluded and the walk
    /// does not continue through it. The list is topologically ordered: a
    /// commit only appears after every in-range commit that has it as a
    /// parent. Among commits that are ready at the same time the most recent
    /// committer timestamp wins, then the larger id.
    pub fn enumerate(
        &self,
        head: &ObjectId,
        boundary: &[ObjectId],
    ) -> Result<Vec<ObjectId>, E> {
        let excluded = self.reachable_from(boundary)?;
        if excluded.contains(head) {
            return Ok(Vec::new());
        }

        let interesting = self.collect_interesting(head, &excluded)?;

        let mut pending_children = HashMap::<&ObjectId, usize>::new();
        for commit in interesting.values() {
            for parent in commit.parents.iter().filter(|p| interesting.contains_key(*p)) {
                *pending_children.entry(parent).or_default() += 1;
            }
        }

        let mut ready = BinaryHeap::<(DateTime<FixedOffset>, &ObjectId)>::new();
        for (oid, commit) in &interesting {
            if !pending_children.contains_key(oid) {
                ready.push((commit.timestamp, oid));
            }
        }

        let mut ordered = Vec::with_capacity(interesting.len());
        while let Some((_, oid)) = ready.pop() {
            ordered.push(oid.clone());

            for parent in &interesting[oid].parents {
                let Some(count) = pending_children.get_mut(parent) else {
                    continue;
                };
                *count -= 1;
                if *count == 0 {
                    ready.push((interesting[parent].timestamp, &interesting[parent].oid));
                }
            }
        }

        Ok(ordered)
    }

    /// Every commit reachable from the given starting points, themselves included
    pub fn reachable_from(&self, starts: &[ObjectId]) -> Result<HashSet<ObjectId>, E> {
        let mut reachable = HashSet::new();
        let mut queue = starts.iter().cloned().collect::<VecDeque<_>>();

        while let Some(oid) = queue.pop_front() {
            if !reachable.insert(oid.clone()) {
                continue;
            }

            let commit = (self.commit_loader)(&oid)?;
            queue.extend(
                commit
                    .parents
                    .into_iter()
                    .filter(|parent| !reachable.contains(parent)),
            );
        }

        Ok(reachable)
    }

    fn collect_interesting(
        &self,
        head: &ObjectId,
        excluded: &HashSet<ObjectId>,
    ) -> Result<HashMap<ObjectId, SlimCommit>, E> {
        let mut interesting = HashMap::new();
        let mut queue = VecDeque::from([head.clone()]);

        while let Some(oid) = queue.pop_front() {
            if excluded.contains(&oid) || interesting.contains_key(&oid) {
                continue;
            }

            let commit = (self.commit_loader)(&oid)?;
            queue.extend(commit.parents.iter().cloned());
            interesting.insert(oid, commit);
        }

        tracing::trace!(
            commits = interesting.len(),
            excluded = excluded.len(),
            "collected commit range"
        );

        Ok(interesting)
    }
}
