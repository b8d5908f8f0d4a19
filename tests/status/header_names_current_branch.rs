use crate::common::command::{init_repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn header_names_current_branch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(init_repository_dir.path(), &["checkout", "-b", "feature"])
        .assert()
        .success();

    run_orb_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("On branch feature"));

    Ok(())
}
