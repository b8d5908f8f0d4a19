use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn hash_object_with_write_stores_blob(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one".to_string(),
    ));

    let output = run_orb_command(repository_dir.path(), &["hash-object", "-w", "1.txt"])
        .assert()
        .success()
        .get_output()
        .stdout
        .trim_ascii()
        .to_vec();
    let oid = String::from_utf8(output)?;
    assert_eq!(oid.len(), 40);

    // Objects land under a two-character fan-out directory
    let object_path = repository_dir
        .path()
        .join(".orb")
        .join("objects")
        .join(&oid[..2])
        .join(&oid[2..]);
    assert!(object_path.is_file());

    Ok(())
}
