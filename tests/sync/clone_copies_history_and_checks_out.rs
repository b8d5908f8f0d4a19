use crate::common::command::{init_repository_dir, repository_dir, run_orb_command};
use crate::common::server::ServeGuard;
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn clone_copies_history_and_checks_out(
    init_repository_dir: TempDir,
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let guard = ServeGuard::start(init_repository_dir.path())?;

    run_orb_command(repository_dir.path(), &["clone", guard.url(), "cloned"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Cloning into 'cloned'...")
                .and(predicate::str::contains("Clone completed successfully!"))
                .and(predicate::str::contains("Repository cloned into 'cloned'")),
        );

    let cloned = repository_dir.path().join("cloned");

    assert_eq!(std::fs::read_to_string(cloned.join("1.txt"))?, "one");
    assert_eq!(
        std::fs::read_to_string(cloned.join("a").join("b").join("3.txt"))?,
        "three"
    );
    assert_eq!(
        std::fs::read_to_string(cloned.join(".orb").join("HEAD"))?,
        "ref: refs/heads/main\n"
    );

    run_orb_command(&cloned, &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Initial commit"));

    run_orb_command(&cloned, &["remote", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("origin\t{}", guard.url())));

    run_orb_command(&cloned, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to commit, working tree clean"));

    Ok(())
}
