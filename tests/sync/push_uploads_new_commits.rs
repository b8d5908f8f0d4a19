use crate::common::command::{init_repository_dir, orb_commit, repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::server::ServeGuard;
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn push_uploads_new_commits(
    init_repository_dir: TempDir,
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let guard = ServeGuard::start(init_repository_dir.path())?;

    run_orb_command(repository_dir.path(), &["clone", guard.url(), "cloned"])
        .assert()
        .success();
    let cloned = repository_dir.path().join("cloned");

    write_file(FileSpec::new(cloned.join("4.txt"), "four".to_string()));
    run_orb_command(&cloned, &["add", "."]).assert().success();
    orb_commit(&cloned, "Second commit").assert().success();

    run_orb_command(&cloned, &["push"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Pushing to origin (")
                .and(predicate::str::is_match(r"Found [0-9]+ objects to push")?)
                .and(predicate::str::contains("Success! Pushed to origin/main")),
        );

    // The served repository now has the commit in its history
    run_orb_command(init_repository_dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Second commit"));

    run_orb_command(&cloned, &["push"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Everything up-to-date"));

    Ok(())
}
