use crate::common::command::{get_head_commit_oid, init_repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn new_branch_points_at_head(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(init_repository_dir.path(), &["branch", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created branch 'feature'"));

    let branch_oid = std::fs::read_to_string(
        init_repository_dir
            .path()
            .join(".orb")
            .join("refs")
            .join("heads")
            .join("feature"),
    )?;
    assert_eq!(
        branch_oid.trim(),
        get_head_commit_oid(init_repository_dir.path())?
    );

    Ok(())
}
