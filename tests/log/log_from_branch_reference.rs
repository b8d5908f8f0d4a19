use crate::common::command::{repository_with_multiple_commits, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn log_from_branch_reference(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_with_multiple_commits.path(), &["branch", "old", "HEAD~2"])
        .assert()
        .success();

    run_orb_command(repository_with_multiple_commits.path(), &["log", "old"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("(old)")
                .and(predicate::str::contains("Second commit"))
                .and(predicate::str::contains("First commit"))
                .and(predicate::str::contains("Fourth commit").not()),
        );

    Ok(())
}
