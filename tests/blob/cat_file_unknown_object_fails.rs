use crate::common::command::{repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn cat_file_unknown_object_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let missing_oid = "deadbeef".repeat(5);

    run_orb_command(repository_dir.path(), &["cat-file", "-p", &missing_oid])
        .assert()
        .failure()
        .stderr(predicate::str::contains(format!(
            "object {} not found",
            missing_oid
        )));

    Ok(())
}
