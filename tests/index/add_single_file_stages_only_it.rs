use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn add_single_file_stages_only_it(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("staged.txt"),
        "staged content".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("untracked.txt"),
        "untracked content".to_string(),
    ));

    run_orb_command(repository_dir.path(), &["add", "staged.txt"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Added 'staged.txt'")
                .and(predicate::str::contains("untracked.txt").not()),
        );

    run_orb_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("new file:   staged.txt")
                .and(predicate::str::contains("Untracked files:"))
                .and(predicate::str::contains("untracked.txt")),
        );

    Ok(())
}
