use crate::common::command::{commit_ids, compare_json, repository_dir};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn compare_packed_refs_and_annotated_tags(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let a = builder.commit(CommitSpec::new("A".into()));
    let b = builder.commit(CommitSpec::new("B".into()).parents(&[&a]));
    let c = builder.commit(CommitSpec::new("C".into()).parents(&[&b]));
    let tag = builder.annotated_tag("v1.0", &a);

    // main only exists in packed-refs; the tag is annotated and packed too
    builder.pack_refs(&[("refs/heads/main", &c), ("refs/tags/v1.0", &tag)]);
    builder.set_ref("refs/remotes/origin/main", &b);

    let output = compare_json(repository_dir.path(), &["v1.0...main", "--commits"]);
    assert_eq!(commit_ids(&output), vec![c.clone(), b.clone()]);

    let output = compare_json(repository_dir.path(), &["origin/main..main", "--commits"]);
    assert_eq!(commit_ids(&output), vec![c.clone()]);

    // the default branch comes from HEAD even when the branch is packed
    let output = compare_json(repository_dir.path(), &["v1.0"]);
    assert_eq!(output["total_commits"], 0);
    let output = compare_json(repository_dir.path(), &["main..", "--default-branch", "v1.0"]);
    assert_eq!(output["total_commits"], 0);
    let output = compare_json(repository_dir.path(), &["..main", "--default-branch", "v1.0"]);
    assert_eq!(output["total_commits"], 2);

    Ok(())
}
