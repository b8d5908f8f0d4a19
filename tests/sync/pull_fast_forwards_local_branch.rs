use crate::common::command::{init_repository_dir, orb_commit, repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::server::ServeGuard;
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn pull_fast_forwards_local_branch(
    init_repository_dir: TempDir,
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let guard = ServeGuard::start(init_repository_dir.path())?;

    run_orb_command(repository_dir.path(), &["clone", guard.url(), "cloned"])
        .assert()
        .success();
    let cloned = repository_dir.path().join("cloned");

    // The served repository moves ahead
    write_file(FileSpec::new(
        init_repository_dir.path().join("fetched.txt"),
        "from remote".to_string(),
    ));
    run_orb_command(init_repository_dir.path(), &["add", "."])
        .assert()
        .success();
    orb_commit(init_repository_dir.path(), "Remote change")
        .assert()
        .success();

    run_orb_command(&cloned, &["pull"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Fast-forward merge successful!")
                .and(predicate::str::contains("Successfully pulled from origin/main")),
        );

    assert_eq!(
        std::fs::read_to_string(cloned.join("fetched.txt"))?,
        "from remote"
    );

    run_orb_command(&cloned, &["pull"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Already up to date!"));

    Ok(())
}
