use crate::common::command::{repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn duplicate_remote_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_orb_command(
        repository_dir.path(),
        &["remote", "add", "origin", "http://localhost:8000"],
    )
    .assert()
    .success();

    run_orb_command(
        repository_dir.path(),
        &["remote", "add", "origin", "http://localhost:9000"],
    )
    .assert()
    .failure()
    .stderr(predicate::str::contains("remote origin already exists"));

    Ok(())
}
