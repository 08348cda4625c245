//! In-memory repository and account directory for unit tests

use crate::artifacts::compare::handle::{RepositoryHandle, TreeChanges};
use crate::artifacts::diff::diff_stat::DiffStat;
use crate::artifacts::identity::account::{Account, AccountDirectory};
use crate::artifacts::objects::commit::{Author, Commit, SlimCommit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::signature::SignatureCheck;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Starting from 2022-01-01
const BASE_TIMESTAMP: i64 = 1640995200;
pub(crate) const DEFAULT_AUTHOR: &str = "Author <author@example.com>";

/// Deterministic 40-character hex id built from a readable name
pub(crate) fn create_oid(id: &str) -> ObjectId {
    let mut hex_string = id
        .as_bytes()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();

    while hex_string.len() < 40 {
        hex_string.push('0');
    }
    hex_string.truncate(40);

    ObjectId::try_parse(hex_string).expect("Invalid test ObjectId")
}

#[derive(Debug, Default)]
pub(crate) struct InMemoryRepository {
    commits: HashMap<ObjectId, Commit>,
    refs: HashMap<String, ObjectId>,
    files: HashMap<ObjectId, BTreeMap<String, String>>,
    signatures: HashMap<ObjectId, SignatureCheck>,
    corrupt: HashSet<ObjectId>,
    diff_calls: AtomicUsize,
}

impl InMemoryRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a commit one hour after the previously added one
    pub(crate) fn add_commit(&mut self, name: &str, parents: &[&str]) -> ObjectId {
        let seconds = BASE_TIMESTAMP + self.commits.len() as i64 * 3600;
        self.insert_commit(name, parents, DEFAULT_AUTHOR, seconds)
    }

    pub(crate) fn add_commit_at(&mut self, name: &str, parents: &[&str], seconds: i64) -> ObjectId {
        self.insert_commit(name, parents, DEFAULT_AUTHOR, seconds)
    }

    pub(crate) fn add_commit_by(&mut self, name: &str, parents: &[&str], author: &str) -> ObjectId {
        let seconds = BASE_TIMESTAMP + self.commits.len() as i64 * 3600;
        self.insert_commit(name, parents, author, seconds)
    }

    fn insert_commit(
        &mut self,
        name: &str,
        parents: &[&str],
        author: &str,
        seconds: i64,
    ) -> ObjectId {
        let oid = create_oid(name);
        let author = Author::try_from(format!("{author} {seconds} +0000").as_str())
            .expect("Invalid test author");
        let commit = Commit::new(
            oid.clone(),
            parents.iter().map(|parent| create_oid(parent)).collect(),
            create_oid(&format!("tree_{name}")),
            author.clone(),
            author,
            format!("{name}\n\nCommit {name}"),
        );

        self.commits.insert(oid.clone(), commit);
        oid
    }

    pub(crate) fn set_ref(&mut self, ref_name: &str, commit_name: &str) {
        self.refs.insert(ref_name.to_string(), create_oid(commit_name));
    }

    pub(crate) fn set_files(&mut self, commit_name: &str, files: &[(&str, &str)]) {
        self.files.insert(
            create_oid(commit_name),
            files
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
        );
    }

    pub(crate) fn set_signature(&mut self, commit_name: &str, check: SignatureCheck) {
        self.signatures.insert(create_oid(commit_name), check);
    }

    /// Make every tree diff involving this commit fail
    pub(crate) fn mark_corrupt(&mut self, commit_name: &str) {
        self.corrupt.insert(create_oid(commit_name));
    }

    pub(crate) fn slim_commit(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.commit(oid)?.to_slim())
    }

    pub(crate) fn diff_calls(&self) -> usize {
        self.diff_calls.load(Ordering::SeqCst)
    }

    fn snapshot(&self, oid: Option<&ObjectId>) -> BTreeMap<String, String> {
        oid.and_then(|oid| self.files.get(oid))
            .cloned()
            .unwrap_or_default()
    }
}

impl RepositoryHandle for InMemoryRepository {
    fn resolve_revision(&self, spec: &str) -> anyhow::Result<Option<ObjectId>> {
        if let Some(oid) = self.refs.get(spec) {
            return Ok(Some(oid.clone()));
        }

        let oid = create_oid(spec);
        Ok(self.commits.contains_key(&oid).then_some(oid))
    }

    fn commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        self.commits
            .get(oid)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("object {oid} not found"))
    }

    fn diff_trees(
        &self,
        old: Option<&ObjectId>,
        new: &ObjectId,
        with_stat: bool,
    ) -> anyhow::Result<TreeChanges> {
        self.diff_calls.fetch_add(1, Ordering::SeqCst);
        if self.corrupt.contains(new) {
            anyhow::bail!("Invalid tree object for commit {new}");
        }

        let old_files = self.snapshot(old);
        let new_files = self.snapshot(Some(new));

        let paths = old_files
            .keys()
            .chain(new_files.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|path| old_files.get(*path) != new_files.get(*path))
            .cloned()
            .collect::<Vec<_>>();

        let stat = with_stat.then(|| {
            paths.iter().fold(DiffStat::default(), |mut total, path| {
                let before = old_files.get(path).map(String::as_bytes).unwrap_or_default();
                let after = new_files.get(path).map(String::as_bytes).unwrap_or_default();
                total += DiffStat::between(before, after);
                total
            })
        });

        Ok(TreeChanges { paths, stat })
    }

    fn verify_signature(&self, oid: &ObjectId) -> anyhow::Result<SignatureCheck> {
        Ok(self
            .signatures
            .get(oid)
            .cloned()
            .unwrap_or(SignatureCheck::Missing))
    }
}

/// Account directory that counts how often it is consulted
#[derive(Debug, Default)]
pub(crate) struct CountingDirectory {
    accounts: Vec<Account>,
    lookups: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingDirectory {
    pub(crate) fn new(accounts: Vec<Account>) -> Self {
        CountingDirectory {
            accounts,
            ..Default::default()
        }
    }

    /// Hold every lookup open for a while so concurrent callers overlap
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AccountDirectory for CountingDirectory {
    async fn lookup_account(&self, identity: &str) -> anyhow::Result<Option<Account>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self
            .accounts
            .iter()
            .find(|account| identity.contains(&format!("<{}>", account.email)))
            .cloned())
    }
}

pub(crate) fn account(id: u64, login: &str, email: &str) -> Account {
    Account {
        id,
        login: login.to_string(),
        full_name: login.to_string(),
        email: email.to_string(),
    }
}
