use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn commit_with_empty_message_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    run_orb_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    run_orb_command(repository_dir.path(), &["commit", "-m", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "aborting commit due to empty commit message",
        ));

    Ok(())
}
