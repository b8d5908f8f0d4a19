use crate::common::command::{init_repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn push_to_unknown_remote_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(init_repository_dir.path(), &["push"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "remote 'origin' not found, use 'orb remote add' to add it first",
        ));

    Ok(())
}
