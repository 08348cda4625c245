use crate::common::command::{compare_json, repository_dir};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn compare_empty_expression_counts_nothing(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let a = builder.commit(CommitSpec::new("A".into()));
    let b = builder.commit(CommitSpec::new("B".into()).parents(&[&a]));
    builder.set_branch("main", &b);

    assert_eq!(
        compare_json(repository_dir.path(), &[]),
        serde_json::json!({ "total_commits": 0 })
    );
    assert_eq!(
        compare_json(repository_dir.path(), &["", "--commits"]),
        serde_json::json!({ "total_commits": 0, "commits": [] })
    );

    Ok(())
}
