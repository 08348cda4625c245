use crate::common::command::{compare_json, repository_dir};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

const CONFIG: &str = r#"
default_branch = "main"
workers = 2

[[accounts]]
id = 7
login = "fake-user"
full_name = "Fake User"
email = "FAKE_USER@example.com"
"#;

#[rstest]
fn compare_accounts_from_config(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let a = builder.commit(CommitSpec::new("A".into()));
    let b = builder.commit(CommitSpec::new("B".into()).parents(&[&a]));
    let c = builder.commit(
        CommitSpec::new("C".into())
            .parents(&[&b])
            .author("Stranger <stranger@example.com>"),
    );
    builder.set_branch("main", &c);
    builder.set_branch("start", &a);
    builder.write_config(CONFIG);

    let output = compare_json(repository_dir.path(), &["start..", "--commits"]);

    assert_eq!(output["total_commits"], 2);
    let commits = output["commits"].as_array().expect("commit list");
    assert!(commits[0].get("author_account").is_none());
    assert_eq!(
        commits[1]["author_account"],
        serde_json::json!({
            "id": 7,
            "login": "fake-user",
            "full_name": "Fake User",
            "email": "FAKE_USER@example.com",
        })
    );

    // an explicit config file replaces the one in the git directory
    let empty = repository_dir.path().join("empty.toml");
    std::fs::write(&empty, "")?;
    let empty_arg = empty.to_string_lossy().to_string();
    let output = compare_json(
        repository_dir.path(),
        &["start..main", "--commits", "--config", &empty_arg],
    );
    assert!(output["commits"][1].get("author_account").is_none());

    Ok(())
}
