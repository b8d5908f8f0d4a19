use crate::common::command::{repository_with_multiple_commits, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn checkout_with_dirty_file_aborts(
    repository_with_multiple_commits: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    // Dirty a file the checkout would remove
    write_file(FileSpec::new(
        repository_with_multiple_commits.path().join("file4.txt"),
        "uncommitted edits".to_string(),
    ));

    run_orb_command(repository_with_multiple_commits.path(), &["checkout", "HEAD~1"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains(
                "Your local changes to the following files would be overwritten by checkout:",
            )
            .and(predicate::str::contains("file4.txt"))
            .and(predicate::str::contains("Aborting")),
        );

    // Nothing was applied
    let content = std::fs::read_to_string(
        repository_with_multiple_commits.path().join("file4.txt"),
    )?;
    assert_eq!(content, "uncommitted edits");

    Ok(())
}
