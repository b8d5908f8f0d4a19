use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn adding_missing_path_warns_and_continues(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));

    run_orb_command(repository_dir.path(), &["add", "nope.txt", "1.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning: cannot stat 'nope.txt'"))
        .stdout(predicate::str::contains("Added '1.txt'"));

    Ok(())
}
