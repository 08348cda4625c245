use crate::common::command::{compare_json, repository_dir};
use crate::common::fixture::{CommitSpec, RepositoryBuilder};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

const ALICE: &str = "Alice <alice@example.com>";
const MALLORY: &str = "Mallory <mallory@example.com>";

#[rstest]
fn compare_verifies_ssh_signatures(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RepositoryBuilder::init(repository_dir.path());
    let root = builder.commit(CommitSpec::new("Root".into()));
    let trusted = builder.commit(
        CommitSpec::new("Signed by a trusted key".into())
            .parents(&[&root])
            .author(ALICE)
            .signed_with(1),
    );
    let unknown_key = builder.commit(
        CommitSpec::new("Signed by an unknown key".into())
            .parents(&[&trusted])
            .author(ALICE)
            .signed_with(2),
    );
    let wrong_principal = builder.commit(
        CommitSpec::new("Signed with alice's key by mallory".into())
            .parents(&[&unknown_key])
            .author(MALLORY)
            .signed_with(1),
    );
    let unsigned = builder.commit(
        CommitSpec::new("Not signed".into())
            .parents(&[&wrong_principal])
            .author(ALICE),
    );
    builder.set_branch("main", &unsigned);

    let signers = repository_dir.path().join("allowed_signers");
    builder.write_allowed_signers(&signers, "alice@example.com", 1);

    let range = format!("{root}..main");
    let signers_arg = signers.to_string_lossy().to_string();
    let output = compare_json(
        repository_dir.path(),
        &[&range, "--verify", "--allowed-signers", &signers_arg],
    );
    let statuses = output["commits"]
        .as_array()
        .expect("commit list")
        .iter()
        .map(|commit| commit["verification"]["status"].as_str().unwrap_or_default().to_string())
        .collect::<Vec<_>>();

    assert_eq!(
        statuses,
        vec!["not_signed", "unverified", "unverified", "verified"]
    );

    let verified = &output["commits"][3]["verification"]["signer"];
    assert_eq!(verified["principal"], "alice@example.com");
    assert!(
        verified["fingerprint"]
            .as_str()
            .unwrap_or_default()
            .starts_with("SHA256:")
    );
    assert!(
        output["commits"][2]["verification"]["reason"]
            .as_str()
            .unwrap_or_default()
            .contains("no trusted principal")
    );

    // without a trust file nothing can be verified
    let untrusted = compare_json(repository_dir.path(), &[&range, "--verify"]);
    assert_eq!(untrusted["commits"][3]["verification"]["status"], "unverified");

    Ok(())
}
