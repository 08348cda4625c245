use crate::common::command::{commit_ids, compare_json, repository_dir};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn compare_unrelated_histories(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let x1 = builder.commit(CommitSpec::new("X1".into()));
    let x2 = builder.commit(CommitSpec::new("X2".into()).parents(&[&x1]));
    let y1 = builder.commit(CommitSpec::new("Y1".into()));
    let y2 = builder.commit(CommitSpec::new("Y2".into()).parents(&[&y1]));
    builder.set_branch("main", &x2);
    builder.set_branch("orphan", &y2);

    assert_eq!(
        compare_json(repository_dir.path(), &["main...orphan"]),
        serde_json::json!({ "total_commits": 2, "unrelated_histories": true })
    );

    let full = compare_json(repository_dir.path(), &["main...orphan", "--commits"]);
    assert_eq!(full["unrelated_histories"], true);
    assert_eq!(commit_ids(&full), vec![y2, y1]);

    // a literal comparison has no merge base and reports nothing unrelated
    let direct = compare_json(repository_dir.path(), &["main..orphan"]);
    assert_eq!(direct, serde_json::json!({ "total_commits": 2 }));

    Ok(())
}
