use crate::common::command::{commit_ids, compare_json, repository_dir};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn compare_double_dot_on_linear_history(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let a = builder.commit(CommitSpec::new("A".into()));
    let b = builder.commit(CommitSpec::new("B".into()).parents(&[&a]));
    let c = builder.commit(CommitSpec::new("C".into()).parents(&[&b]));
    builder.set_branch("main", &c);

    let range = format!("{a}..{c}");
    let output = compare_json(repository_dir.path(), &[&range, "--commits"]);
    assert_eq!(output["total_commits"], 2);
    assert_eq!(commit_ids(&output), vec![c.clone(), b.clone()]);

    // abbreviated ids and revision suffixes resolve to the same commits
    let abbreviated = format!("{}..main", &a[..8]);
    let output = compare_json(repository_dir.path(), &[&abbreviated, "--commits"]);
    assert_eq!(commit_ids(&output), vec![c.clone(), b.clone()]);

    let output = compare_json(repository_dir.path(), &["main~2..main^", "--commits"]);
    assert_eq!(commit_ids(&output), vec![b]);

    // head behind base is an empty range, not an error
    let behind = format!("{c}..{a}");
    assert_eq!(
        compare_json(repository_dir.path(), &[&behind]),
        serde_json::json!({ "total_commits": 0 })
    );

    Ok(())
}
