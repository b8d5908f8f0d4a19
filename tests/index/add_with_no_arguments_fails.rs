use crate::common::command::{repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn add_with_no_arguments_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    run_orb_command(repository_dir.path(), &["add"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing specified, nothing added"));

    Ok(())
}
