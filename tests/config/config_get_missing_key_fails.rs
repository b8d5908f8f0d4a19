use crate::common::command::{repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn config_get_missing_key_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_orb_command(repository_dir.path(), &["config", "user.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no value set for user.nope"));

    Ok(())
}
