use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository with one commit containing `1.txt`, `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    );
    write_file(file3);

    run_orb_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    orb_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

/// A repository with a linear history of four commits, one file per commit
#[fixture]
pub fn repository_with_multiple_commits(repository_dir: TempDir) -> TempDir {
    run_orb_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    for (number, ordinal) in ["First", "Second", "Third", "Fourth"].iter().enumerate() {
        let file = FileSpec::new(
            repository_dir.path().join(format!("file{}.txt", number + 1)),
            format!("content {}", number + 1),
        );
        write_file(file);

        run_orb_command(repository_dir.path(), &["add", "."])
            .assert()
            .success();

        orb_commit(repository_dir.path(), &format!("{} commit", ordinal))
            .assert()
            .success();
    }

    repository_dir
}

pub fn run_orb_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("orb").expect("Failed to find orb binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

/// Commit with a pinned author and timestamp so output is reproducible
pub fn orb_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_orb_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("ORB_AUTHOR_NAME", &"fake_user".to_string()),
        ("ORB_AUTHOR_EMAIL", &"fake_email@email.com".to_string()),
        ("ORB_AUTHOR_DATE", &"2023-01-01 12:00:00 +0000".to_string()), // %Y-%m-%d %H:%M:%S %z
    ]);
    cmd
}

/// Read the commit HEAD points at, following a symbolic ref if needed
pub fn get_head_commit_oid(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".orb").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".orb").join(ref_path.trim());
        let commit_oid = std::fs::read_to_string(ref_file)?;
        Ok(commit_oid.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}

/// Get the parent commit ID of a given commit by using orb cat-file
pub fn get_parent_commit_oid(
    dir: &Path,
    commit_oid: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let output = run_orb_command(dir, &["cat-file", "-p", commit_oid]).output()?;

    let stdout = String::from_utf8(output.stdout)?;

    // Find the parent line
    for line in stdout.lines() {
        if let Some(oid) = line.strip_prefix("parent ") {
            return Ok(oid.to_string());
        }
    }

    Err("No parent found".into())
}

/// Get the Nth ancestor of a commit
pub fn get_ancestor_commit_oid(
    dir: &Path,
    commit_oid: &str,
    generations: usize,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut current = commit_oid.to_string();
    for _ in 0..generations {
        current = get_parent_commit_oid(dir, &current)?;
    }
    Ok(current)
}
