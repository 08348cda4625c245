use crate::common::command::{compare_json, repository_dir};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn compare_stats_and_files(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let a = builder.commit(
        CommitSpec::new("Initial".into()).files(&[
            ("README.md", "# project\n"),
            ("src/lib.rs", "pub fn one() {}\n"),
        ]),
    );
    let b = builder.commit(
        CommitSpec::new("Grow library".into())
            .parents(&[&a])
            .files(&[
                ("README.md", "# project\n"),
                ("src/lib.rs", "pub fn one() {}\npub fn two() {}\n"),
                ("src/nested/mod.rs", "mod deep;\n"),
            ]),
    );
    let c = builder.commit(
        CommitSpec::new("Rewrite readme".into())
            .parents(&[&b])
            .files(&[
                ("README.md", "# renamed project\nwith a tagline\n"),
                ("src/lib.rs", "pub fn one() {}\npub fn two() {}\n"),
                ("src/nested/mod.rs", "mod deep;\n"),
            ]),
    );
    builder.set_branch("main", &c);

    let root_range = format!("..{a}");
    let output = compare_json(repository_dir.path(), &[&root_range, "--stat", "--files"]);
    assert_eq!(output["total_commits"], 0);

    let range = format!("{a}..main");
    let output = compare_json(repository_dir.path(), &[&range, "--stat", "--files"]);
    let commits = output["commits"].as_array().expect("commit list");

    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0]["files_changed"], serde_json::json!(["README.md"]));
    assert_eq!(commits[0]["insertions"], 2);
    assert_eq!(commits[0]["deletions"], 1);
    assert_eq!(
        commits[1]["files_changed"],
        serde_json::json!(["src/lib.rs", "src/nested/mod.rs"])
    );
    assert_eq!(commits[1]["insertions"], 2);
    assert_eq!(commits[1]["deletions"], 0);

    // fields that were not asked for are left out
    let files_only = compare_json(repository_dir.path(), &[&range, "--files"]);
    let first = files_only["commits"][0].as_object().expect("commit object");
    assert!(first.contains_key("files_changed"));
    assert!(!first.contains_key("insertions"));
    assert!(!first.contains_key("deletions"));
    assert!(!first.contains_key("verification"));

    Ok(())
}
