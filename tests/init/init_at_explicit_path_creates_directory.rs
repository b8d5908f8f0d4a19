use crate::common::command::{repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn init_at_explicit_path_creates_directory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let nested = repository_dir.path().join("project").join("nested");
    assert!(!nested.exists());

    run_orb_command(repository_dir.path(), &["init", "project/nested"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty orb repository in",
        ));

    assert!(nested.join(".orb").is_dir());
    assert!(nested.join(".orb").join("objects").is_dir());

    Ok(())
}
