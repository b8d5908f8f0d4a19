use crate::common::command::{repository_dir, run_orb_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

#[rstest]
fn staging_identical_content_stores_one_object(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("left.txt"),
        "same bytes".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("right.txt"),
        "same bytes".to_string(),
    ));

    run_orb_command(repository_dir.path(), &["add", "left.txt", "right.txt"])
        .assert()
        .success();

    // Both entries point at the same blob
    let index = std::fs::read_to_string(repository_dir.path().join(".orb").join("index"))?;
    let oids = index
        .lines()
        .filter_map(|line| line.split_once(' ').map(|(oid, _)| oid))
        .collect::<Vec<_>>();
    assert_eq!(oids.len(), 2);
    assert_eq!(oids[0], oids[1]);

    // and that blob is stored exactly once
    let objects_dir = repository_dir.path().join(".orb").join("objects");
    assert_eq!(count_stored_objects(&objects_dir)?, 1);

    Ok(())
}

fn count_stored_objects(objects_dir: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let mut count = 0;
    for shard in std::fs::read_dir(objects_dir)? {
        let shard = shard?.path();
        if shard.is_dir() {
            count += std::fs::read_dir(&shard)?.count();
        }
    }
    Ok(count)
}
