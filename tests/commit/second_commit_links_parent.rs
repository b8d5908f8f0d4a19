use crate::common::command::{
    get_head_commit_oid, get_parent_commit_oid, init_repository_dir, orb_commit, run_orb_command,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn second_commit_links_parent(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let first_oid = get_head_commit_oid(init_repository_dir.path())?;

    write_file(FileSpec::new(
        init_repository_dir.path().join("4.txt"),
        "four".to_string(),
    ));
    run_orb_command(init_repository_dir.path(), &["add", "."])
        .assert()
        .success();

    orb_commit(init_repository_dir.path(), "Second commit")
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"^\[[0-9a-f]{7}\] Second commit\n$")?
                .and(predicate::str::contains("root-commit").not()),
        );

    let second_oid = get_head_commit_oid(init_repository_dir.path())?;
    assert_eq!(
        get_parent_commit_oid(init_repository_dir.path(), &second_oid)?,
        first_oid
    );

    Ok(())
}
