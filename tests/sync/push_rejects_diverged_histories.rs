use crate::common::command::{init_repository_dir, orb_commit, repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::server::ServeGuard;
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn push_rejects_diverged_histories(
    init_repository_dir: TempDir,
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let guard = ServeGuard::start(init_repository_dir.path())?;

    run_orb_command(repository_dir.path(), &["clone", guard.url(), "cloned"])
        .assert()
        .success();
    let cloned = repository_dir.path().join("cloned");

    // Both sides commit after the clone
    write_file(FileSpec::new(
        init_repository_dir.path().join("remote.txt"),
        "remote side".to_string(),
    ));
    run_orb_command(init_repository_dir.path(), &["add", "."])
        .assert()
        .success();
    orb_commit(init_repository_dir.path(), "Remote change")
        .assert()
        .success();

    write_file(FileSpec::new(
        cloned.join("local.txt"),
        "local side".to_string(),
    ));
    run_orb_command(&cloned, &["add", "."]).assert().success();
    orb_commit(&cloned, "Local change").assert().success();

    run_orb_command(&cloned, &["push"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hint: pull the remote changes first"));

    Ok(())
}
