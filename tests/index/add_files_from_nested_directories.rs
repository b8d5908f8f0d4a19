use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn add_files_from_nested_directories(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    ));

    run_orb_command(repository_dir.path(), &["add", "."])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Added '1.txt'")
                .and(predicate::str::contains("Added 'a/2.txt'"))
                .and(predicate::str::contains("Added 'a/b/3.txt'")),
        );

    Ok(())
}
