use crate::common::command::{get_head_commit_oid, init_repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn detached_head_reported_with_short_oid(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let head_oid = get_head_commit_oid(init_repository_dir.path())?;

    run_orb_command(init_repository_dir.path(), &["checkout", &head_oid])
        .assert()
        .success();

    run_orb_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "HEAD detached at {}",
            &head_oid[..7]
        )));

    Ok(())
}
