use crate::common::command::{commit_ids, compare_json, repository_dir};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn compare_triple_dot_since_merge_base(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());

    // main: A - B - C, feature branches off B: D - E
    let a = builder.commit(CommitSpec::new("A".into()));
    let b = builder.commit(CommitSpec::new("B".into()).parents(&[&a]));
    let c = builder.commit(CommitSpec::new("C".into()).parents(&[&b]));
    let d = builder.commit(CommitSpec::new("D".into()).parents(&[&b]));
    let e = builder.commit(CommitSpec::new("E".into()).parents(&[&d]));
    builder.set_branch("main", &c);
    builder.set_branch("feature", &e);

    let minimal = compare_json(repository_dir.path(), &["main...feature"]);
    assert_eq!(minimal, serde_json::json!({ "total_commits": 2 }));

    let full = compare_json(repository_dir.path(), &["main...feature", "--commits"]);
    assert_eq!(commit_ids(&full), vec![e, d.clone()]);
    assert_eq!(full["commits"][1]["parents"], serde_json::json!([b]));
    assert_eq!(full["commits"][1]["message"], "D");

    // the other direction only sees C
    let reverse = compare_json(repository_dir.path(), &["feature...main", "--commits"]);
    assert_eq!(commit_ids(&reverse), vec![c]);

    Ok(())
}
