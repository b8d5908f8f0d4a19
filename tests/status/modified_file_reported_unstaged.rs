use crate::common::command::{init_repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn modified_file_reported_unstaged(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "changed content".to_string(),
    ));

    run_orb_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Changes not staged for commit:")
                .and(predicate::str::contains("        modified:   1.txt"))
                .and(predicate::str::contains("Changes to be committed:").not()),
        );

    Ok(())
}
