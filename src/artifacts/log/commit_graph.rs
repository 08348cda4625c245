use crate::artifacts::compare::cancel::CancellationSignal;
use crate::artifacts::compare::error::CompareError;
use crate::artifacts::compare::handle::RepositoryHandle;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object_id::ObjectId;
use std::cell::RefCell;
use std::collections::HashMap;

/// Arena of commits keyed by id
///
/// Parent edges are ids looked up in the arena, so the graph never holds
/// references between commits. Each commit is read from the repository at
/// most once per comparison, and every read first checks for cancellation.
pub struct CommitGraph<'r, R: RepositoryHandle + ?Sized> {
    repository: &'r R,
    cancel: &'r CancellationSignal,
    commits: RefCell<HashMap<ObjectId, Commit>>,
}

impl<'r, R: RepositoryHandle + ?Sized> CommitGraph<'r, R> {
    pub fn new(repository: &'r R, cancel: &'r CancellationSignal) -> Self {
        CommitGraph {
            repository,
            cancel,
            commits: RefCell::new(HashMap::new()),
        }
    }

    pub fn commit(&self, oid: &ObjectId) -> Result<Commit, CompareError> {
        if let Some(commit) = self.commits.borrow().get(oid) {
            return Ok(commit.clone());
        }

        self.cancel.check()?;
        let commit = self
            .repository
            .commit(oid)
            .map_err(CompareError::RepositoryUnavailable)?;
        self.commits
            .borrow_mut()
            .insert(oid.clone(), commit.clone());

        Ok(commit)
    }

    pub fn slim_commit(&self, oid: &ObjectId) -> Result<SlimCommit, CompareError> {
        if let Some(commit) = self.commits.borrow().get(oid) {
            return Ok(commit.to_slim());
        }

        Ok(self.commit(oid)?.to_slim())
    }

    /// Number of distinct commits read so far
    pub fn len(&self) -> usize {
        self.commits.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.borrow().is_empty()
    }
}
