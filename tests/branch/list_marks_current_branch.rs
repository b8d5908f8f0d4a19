use crate::common::command::{init_repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn list_marks_current_branch(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(init_repository_dir.path(), &["branch", "zeta"])
        .assert()
        .success();
    run_orb_command(init_repository_dir.path(), &["branch", "feature"])
        .assert()
        .success();

    run_orb_command(init_repository_dir.path(), &["branch"])
        .assert()
        .success()
        .stdout(predicate::str::diff("  feature\n* main\n  zeta\n"));

    Ok(())
}
