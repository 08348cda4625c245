use crate::common::command::{compare_json, repository_dir, run_bit_compare};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn compare_corrupt_object_fails(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let a = builder.commit(CommitSpec::new("A".into()).files(&[("notes.txt", "first\n")]));
    let b = builder.commit(
        CommitSpec::new("B".into())
            .parents(&[&a])
            .files(&[("notes.txt", "second\n")]),
    );
    builder.set_branch("main", &b);

    let blob = builder.write_object("blob", b"second\n");
    std::fs::write(builder.object_path(&blob), b"definitely not zlib")?;

    // counting never reads trees or blobs
    let output = compare_json(repository_dir.path(), &[&format!("{a}..main")]);
    assert_eq!(output["total_commits"], 1);

    run_bit_compare(repository_dir.path(), &[&format!("{a}..main"), "--stat"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains(b.as_str()));

    Ok(())
}
