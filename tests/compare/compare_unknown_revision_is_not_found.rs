use crate::common::command::{repository_dir, run_bit_compare};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
#[case("main...nope", "nope")]
#[case("nope..main", "nope")]
#[case("main..main~5", "main~5")]
#[case("bad..name..", "bad")]
#[case("   ", "   ")]
fn compare_unknown_revision_is_not_found(
    repository_dir: TempDir,
    #[case] basehead: &str,
    #[case] missing: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let a = builder.commit(CommitSpec::new("A".into()));
    builder.set_branch("main", &a);

    run_bit_compare(repository_dir.path(), &[basehead])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(format!(
            "fatal: revision '{missing}' not found"
        )));

    Ok(())
}

#[rstest]
#[case("main..gone", "gone")]
#[case("v0...main", "v0")]
fn compare_dangling_ref_is_not_found(
    repository_dir: TempDir,
    #[case] basehead: &str,
    #[case] missing: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let a = builder.commit(CommitSpec::new("A".into()));
    builder.set_branch("main", &a);

    let absent = "1234567890".repeat(4);
    builder.set_branch("gone", &absent);
    let tag = builder.annotated_tag("v0", &absent);
    builder.set_ref("refs/tags/v0", &tag);

    run_bit_compare(repository_dir.path(), &[basehead])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(format!(
            "fatal: revision '{missing}' not found"
        )));

    Ok(())
}
