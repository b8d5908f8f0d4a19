use crate::common::command::{init_repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::*;
use rstest::rstest;

#[rstest]
fn clean_tree_after_commit(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(init_repository_dir.path(), &["status"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("On branch main")
                .and(predicate::str::contains("nothing to commit, working tree clean")),
        );

    Ok(())
}
