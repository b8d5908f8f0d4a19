use crate::common::command::{repository_with_multiple_commits, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn log_shows_linear_history_in_medium_format(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_with_multiple_commits.path(), &["log"])
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(
                r"(?s)Fourth commit.*Third commit.*Second commit.*First commit",
            )?
            .and(predicate::str::contains("(HEAD -> main)"))
            .and(predicate::str::contains(
                "Author: fake_user <fake_email@email.com>",
            ))
            .and(predicate::str::contains(
                "Date:   Sun, 01 Jan 2023 12:00:00 +0000",
            ))
            .and(predicate::str::contains("    Fourth commit")),
        );

    Ok(())
}
