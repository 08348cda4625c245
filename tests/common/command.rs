use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

pub fn run_bit_compare(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("bit-compare").expect("Failed to find bit-compare binary");
    cmd.env("NO_COLOR", "1");
    cmd.env_remove("BIT_COMPARE_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Run a comparison expected to succeed and parse its JSON output
pub fn compare_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let output = run_bit_compare(dir, args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    serde_json::from_slice(&output).expect("Output is not valid JSON")
}

/// Ids of the `commits` array in a comparison's JSON output
pub fn commit_ids(output: &serde_json::Value) -> Vec<String> {
    output["commits"]
        .as_array()
        .expect("Output has no commit list")
        .iter()
        .map(|commit| commit["id"].as_str().expect("Commit has no id").to_string())
        .collect()
}
