use crate::common::command::{
    get_head_commit_oid, init_repository_dir, orb_commit, repository_dir, run_orb_command,
};
use crate::common::file::{FileSpec, write_file};
use crate::common::server::ServeGuard;
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn pull_with_dirty_file_keeps_ref_and_tree(
    init_repository_dir: TempDir,
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let guard = ServeGuard::start(init_repository_dir.path())?;

    run_orb_command(repository_dir.path(), &["clone", guard.url(), "cloned"])
        .assert()
        .success();
    let cloned = repository_dir.path().join("cloned");
    let tip_before = get_head_commit_oid(&cloned)?;

    // The served repository rewrites a file the clone has dirtied
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "remote edit".to_string(),
    ));
    run_orb_command(init_repository_dir.path(), &["add", "."])
        .assert()
        .success();
    orb_commit(init_repository_dir.path(), "Remote change")
        .assert()
        .success();

    write_file(FileSpec::new(cloned.join("1.txt"), "local edit".to_string()));

    run_orb_command(&cloned, &["pull"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains(
                "Your local changes to the following files would be overwritten by checkout:",
            )
            .and(predicate::str::contains("1.txt"))
            .and(predicate::str::contains("Aborting")),
        );

    // Neither the ref nor the working tree moved
    assert_eq!(get_head_commit_oid(&cloned)?, tip_before);
    assert_eq!(std::fs::read_to_string(cloned.join("1.txt"))?, "local edit");

    Ok(())
}
