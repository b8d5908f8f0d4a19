use crate::common::command::{repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn config_set_then_get_round_trips(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_orb_command(repository_dir.path(), &["config", "user.name", "Ada"])
        .assert()
        .success();

    run_orb_command(repository_dir.path(), &["config", "user.name"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Ada\n"));

    Ok(())
}
