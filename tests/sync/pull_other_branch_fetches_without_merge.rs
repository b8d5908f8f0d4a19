use crate::common::command::{init_repository_dir, orb_commit, repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use crate::common::server::ServeGuard;
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn pull_other_branch_fetches_without_merge(
    init_repository_dir: TempDir,
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    // Grow a feature branch on the served side, then park HEAD back on main
    run_orb_command(init_repository_dir.path(), &["checkout", "-b", "feature"])
        .assert()
        .success();
    write_file(FileSpec::new(
        init_repository_dir.path().join("feature.txt"),
        "feature work".to_string(),
    ));
    run_orb_command(init_repository_dir.path(), &["add", "."])
        .assert()
        .success();
    orb_commit(init_repository_dir.path(), "Feature work")
        .assert()
        .success();
    run_orb_command(init_repository_dir.path(), &["checkout", "main"])
        .assert()
        .success();

    let guard = ServeGuard::start(init_repository_dir.path())?;

    run_orb_command(repository_dir.path(), &["clone", guard.url(), "cloned"])
        .assert()
        .success();
    let cloned = repository_dir.path().join("cloned");

    run_orb_command(&cloned, &["pull", "origin", "feature"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(
                "Warning: You're not on branch 'feature'. Fetch completed but not merged.",
            )
            .and(predicate::str::contains(
                "Use 'orb checkout feature' to switch to this branch.",
            )),
        );

    // Objects arrived but no local ref or file was created
    assert!(
        !cloned
            .join(".orb")
            .join("refs")
            .join("heads")
            .join("feature")
            .exists()
    );
    assert!(!cloned.join("feature.txt").exists());

    Ok(())
}
