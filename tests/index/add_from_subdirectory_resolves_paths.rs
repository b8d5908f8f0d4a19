use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn add_from_subdirectory_resolves_paths(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));

    // A path relative to the subdirectory the command runs from
    run_orb_command(&repository_dir.path().join("a"), &["add", "2.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'a/2.txt'"));

    Ok(())
}
