use crate::common::command::{get_head_commit_oid, repository_with_multiple_commits, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn log_with_oid_prefix(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let head_oid = get_head_commit_oid(repository_with_multiple_commits.path())?;

    run_orb_command(repository_with_multiple_commits.path(), &["log", &head_oid[..8]])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Fourth commit").and(predicate::str::contains(&head_oid)),
        );

    Ok(())
}
