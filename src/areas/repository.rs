use crate::areas::database::Database;
use crate::areas::refs::Refs;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::compare::handle::{RepositoryHandle, TreeChanges};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::signature::allowed_signers::AllowedSigners;
use crate::artifacts::signature::{SignatureCheck, check_commit_signature};
use anyhow::Context;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

const GIT_DIR: &str = ".git";

/// An on-disk repository opened for reading
///
/// Nothing under the git directory is ever written.
pub struct Repository {
    path: Box<Path>,
    git_path: Box<Path>,
    writer: Mutex<Box<dyn std::io::Write + Send>>,
    database: Database,
    refs: Refs,
    allowed_signers: AllowedSigners,
}

impl Repository {
    /// Open the repository at `path`, either a work tree with a `.git`
    /// directory or a bare git directory
    pub fn new(path: &str, writer: Box<dyn std::io::Write + Send>) -> anyhow::Result<Self> {
        let path = Path::new(path)
            .canonicalize()
            .with_context(|| format!("Unable to open repository at {path}"))?;

        let git_path = if path.join(GIT_DIR).is_dir() {
            path.join(GIT_DIR)
        } else if path.join("objects").is_dir() && path.join("HEAD").is_file() {
            path.clone()
        } else {
            anyhow::bail!("not a git repository: {}", path.display());
        };

        let database = Database::new(git_path.join("objects").into_boxed_path());
        let refs = Refs::new(git_path.clone().into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            git_path: git_path.into_boxed_path(),
            writer: Mutex::new(writer),
            database,
            refs,
            allowed_signers: AllowedSigners::default(),
        })
    }

    pub fn with_allowed_signers(mut self, allowed_signers: AllowedSigners) -> Self {
        self.allowed_signers = allowed_signers;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> &Path {
        &self.git_path
    }

    pub fn writer(&self) -> MutexGuard<'_, Box<dyn std::io::Write + Send>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn allowed_signers(&self) -> &AllowedSigners {
        &self.allowed_signers
    }
}

impl RepositoryHandle for Repository {
    fn resolve_revision(&self, spec: &str) -> anyhow::Result<Option<ObjectId>> {
        match Revision::try_parse(spec) {
            Ok(revision) => revision.resolve(self),
            Err(err) => {
                tracing::debug!(spec, error = %err, "unparseable revision");
                Ok(None)
            }
        }
    }

    fn commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        self.database
            .parse_object_as_commit(oid)?
            .with_context(|| format!("object {oid} is not a commit"))
    }

    fn diff_trees(
        &self,
        old: Option<&ObjectId>,
        new: &ObjectId,
        with_stat: bool,
    ) -> anyhow::Result<TreeChanges> {
        let tree_diff = self
            .database
            .tree_diff(old, Some(new))
            .with_context(|| format!("Unable to diff commit {new}"))?;

        let stat = if with_stat {
            Some(tree_diff.stat()?)
        } else {
            None
        };

        Ok(TreeChanges {
            paths: tree_diff.changed_paths(),
            stat,
        })
    }

    fn verify_signature(&self, oid: &ObjectId) -> anyhow::Result<SignatureCheck> {
        let body = self.database.read_raw_commit(oid)?;
        let commit = Commit::deserialize(oid.clone(), &body)?;

        Ok(check_commit_signature(
            &body,
            &self.allowed_signers,
            commit.committer().email(),
        ))
    }
}
