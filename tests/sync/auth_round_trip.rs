use crate::common::command::{init_repository_dir, repository_dir, run_orb_command};
use crate::common::server::ServeGuard;
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn auth_round_trip(
    init_repository_dir: TempDir,
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let guard = ServeGuard::start(init_repository_dir.path())?;
    run_orb_command(repository_dir.path(), &["clone", guard.url(), "cloned"])
        .assert()
        .success();
    let cloned = repository_dir.path().join("cloned");
    drop(guard);

    // Restart the server with credentials on a fresh port
    let guard = ServeGuard::start_with_auth(init_repository_dir.path(), "alice:secret")?;
    run_orb_command(&cloned, &["config", "remote.origin.url", guard.url()])
        .assert()
        .success();

    run_orb_command(&cloned, &["push"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("401"));

    run_orb_command(&cloned, &["config", "remote.origin.username", "alice"])
        .assert()
        .success();
    run_orb_command(&cloned, &["config", "remote.origin.password", "secret"])
        .assert()
        .success();

    run_orb_command(&cloned, &["push"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Everything up-to-date"));

    Ok(())
}
