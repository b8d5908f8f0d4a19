use crate::common::command::{orb_commit, repository_dir, run_orb_command};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn checkout_restores_binary_content(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    // Not valid UTF-8, including a NUL byte
    let original = [0x00u8, 0xFF, 0x80, 0x01, 0x7F];
    std::fs::write(repository_dir.path().join("blob.bin"), original)?;
    run_orb_command(repository_dir.path(), &["add", "blob.bin"])
        .assert()
        .success();
    orb_commit(repository_dir.path(), "Binary snapshot")
        .assert()
        .success();

    run_orb_command(repository_dir.path(), &["checkout", "-b", "feature"])
        .assert()
        .success();
    std::fs::write(repository_dir.path().join("blob.bin"), [0xDEu8, 0xAD, 0x00])?;
    run_orb_command(repository_dir.path(), &["add", "blob.bin"])
        .assert()
        .success();
    orb_commit(repository_dir.path(), "Replace binary")
        .assert()
        .success();

    run_orb_command(repository_dir.path(), &["checkout", "main"])
        .assert()
        .success();

    assert_eq!(
        std::fs::read(repository_dir.path().join("blob.bin"))?,
        original
    );

    Ok(())
}
