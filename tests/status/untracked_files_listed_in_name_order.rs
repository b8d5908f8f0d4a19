use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn untracked_files_listed_in_name_order(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    // Created out of order on purpose
    write_file(FileSpec::new(
        repository_dir.path().join("b.txt"),
        "second".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a.txt"),
        "first".to_string(),
    ));

    run_orb_command(repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Untracked files:")
                .and(predicate::str::contains("        a.txt\n        b.txt"))
                .and(predicate::str::contains(
                    "nothing added to commit but untracked files present (use \"orb add\" to track)",
                )),
        );

    Ok(())
}
