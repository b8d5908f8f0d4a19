use crate::common::command::{get_head_commit_oid, init_repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn detached_head_appears_in_decoration(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let head_oid = get_head_commit_oid(init_repository_dir.path())?;

    run_orb_command(init_repository_dir.path(), &["checkout", &head_oid])
        .assert()
        .success();

    run_orb_command(init_repository_dir.path(), &["log"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(HEAD, main)"));

    Ok(())
}
