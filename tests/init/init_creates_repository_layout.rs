use crate::common::command::{repository_dir, run_orb_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn init_creates_repository_layout(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir_absolute_path = repository_dir.path().canonicalize()?.display().to_string();

    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Initialized empty orb repository in",
        ))
        .stdout(predicate::str::contains(dir_absolute_path));

    let orb_path = repository_dir.path().join(".orb");
    assert!(orb_path.join("objects").is_dir());
    assert!(orb_path.join("refs").join("heads").is_dir());
    assert!(orb_path.join("refs").join("tags").is_dir());
    assert!(orb_path.join("index").is_file());

    // HEAD points at the default branch, whose file only appears with the
    // first commit
    let head_content = std::fs::read_to_string(orb_path.join("HEAD"))?;
    assert_eq!(head_content, "ref: refs/heads/main\n");
    let heads = std::fs::read_dir(orb_path.join("refs").join("heads"))?;
    assert_eq!(heads.count(), 0);

    let config_content = std::fs::read_to_string(orb_path.join("config"))?;
    assert!(config_content.contains("[core]"));
    assert!(config_content.contains("repositoryformatversion = 0"));
    assert!(config_content.contains("filemode = true"));

    Ok(())
}
