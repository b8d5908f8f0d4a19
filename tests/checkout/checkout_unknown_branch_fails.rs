use crate::common::command::{init_repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn checkout_unknown_branch_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(init_repository_dir.path(), &["checkout", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("branch nope not found"));

    Ok(())
}
