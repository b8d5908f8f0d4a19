use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn hash_object_prints_oid_without_writing(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));

    run_orb_command(repository_dir.path(), &["hash-object", "1.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9a-f]{40}\n$")?);

    // Without -w the database stays empty
    let objects_path = repository_dir.path().join(".orb").join("objects");
    assert_eq!(std::fs::read_dir(&objects_path)?.count(), 0);

    Ok(())
}
