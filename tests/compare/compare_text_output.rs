use crate::common::command::{repository_dir, run_bit_compare};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn compare_text_output(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let a = builder.commit(CommitSpec::new("A".into()));
    let b = builder.commit(CommitSpec::new("Add feature".into()).parents(&[&a]));
    let c = builder.commit(CommitSpec::new("Hotfix".into()).parents(&[&a]));
    builder.set_branch("main", &c);
    builder.set_branch("feature", &b);

    run_bit_compare(repository_dir.path(), &["main...feature", "--format", "text", "--stat"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Comparing main...feature ({} .. {})",
            &c[..7],
            &b[..7]
        )))
        .stdout(predicate::str::contains(format!("Merge base: {}", &a[..7])))
        .stdout(predicate::str::contains("1 commit\n"))
        .stdout(predicate::str::contains(format!("commit {b}")))
        .stdout(predicate::str::contains("    Add feature"))
        .stdout(predicate::str::contains(format!("commit {c}")).not());

    run_bit_compare(repository_dir.path(), &["main..feature", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Comparing main..feature"))
        .stdout(predicate::str::contains("Merge base").not())
        .stdout(predicate::str::contains("1 commit\n"));

    Ok(())
}
