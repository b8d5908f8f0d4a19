use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn ls_tree_on_blob_fails(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));

    let output = run_orb_command(repository_dir.path(), &["hash-object", "-w", "1.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .trim_ascii()
        .to_vec();
    let blob_oid = String::from_utf8(output)?;

    run_orb_command(repository_dir.path(), &["ls-tree", &blob_oid])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a tree object"));

    Ok(())
}
