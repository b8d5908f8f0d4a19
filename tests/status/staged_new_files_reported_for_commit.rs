use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn staged_new_files_reported_for_commit(
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
    run_orb_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    run_orb_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Changes to be committed:")
                .and(predicate::str::contains("        new file:   1.txt"))
                .and(predicate::str::contains("        new file:   a/2.txt"))
                .and(predicate::str::contains("Untracked files:").not()),
        );

    Ok(())
}
