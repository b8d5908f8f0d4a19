use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::{DEFAULT_BRANCH_NAME, FALLBACK_BRANCH_NAME};
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::OrbError;
use crate::sync::client::{self, SyncClient};
use crate::sync::protocol::FetchRequest;
use std::io::Write;
use std::path::Path;

/// Clone a remote repository into `directory`
///
/// Unlike the other commands this is a free function: the repository does
/// not exist until clone creates it.
pub async fn clone(
    url: &str,
    directory: Option<&str>,
    mut writer: Box<dyn Write>,
) -> anyhow::Result<()> {
    if !client::is_valid_url(url) {
        anyhow::bail!(OrbError::ValidationError(format!(
            "invalid URL format: {} - must begin with http:// or https://",
            url
        )));
    }

    let directory = match directory {
        Some(directory) => directory.to_string(),
        None => derive_directory(url)?,
    };
    let destination = Path::new(&directory);

    if destination.exists()
        && (!destination.is_dir() || destination.read_dir()?.next().is_some())
    {
        anyhow::bail!(
            "destination path '{}' already exists and is not an empty directory",
            directory
        );
    }

    writeln!(writer, "Cloning into '{}'...", directory)?;

    let repository = Repository::new(destination, writer)?;
    repository.initialize_storage().await?;

    writeln!(repository.writer(), "Fetching remote refs...")?;
    let client = SyncClient::new(url, None)?;
    let remote_refs = client.fetch_refs().await?;

    let (branch, tip) = [DEFAULT_BRANCH_NAME, FALLBACK_BRANCH_NAME]
        .iter()
        .find_map(|name| {
            remote_refs
                .iter()
                .find(|(sym_ref, _)| sym_ref.to_short_name() == *name)
                .map(|(sym_ref, oid)| (sym_ref.to_short_name().to_string(), oid.clone()))
        })
        .ok_or_else(|| anyhow::anyhow!("remote repository has no 'main' or 'master' branch"))?;

    writeln!(
        repository.writer(),
        "Remote {} branch found at commit {}",
        branch,
        &tip.as_ref()[..8]
    )?;

    writeln!(repository.writer(), "Fetching objects...")?;
    let request = FetchRequest {
        wants: vec![tip.clone()],
        haves: Vec::new(),
    };
    let frames = client.fetch_objects(&request).await?;

    for frame in &frames {
        repository.database().store_raw(frame.clone())?;
    }
    writeln!(repository.writer(), "Received {} objects", frames.len())?;

    repository
        .refs()
        .create_branch(BranchName::try_parse(branch.clone())?, tip.clone())?;
    repository
        .refs()
        .set_head(&branch, format!("ref: refs/heads/{}", branch))?;

    {
        let mut config = repository.config_mut();
        config.add_remote("origin", url)?;
        config.set(format!("branch.{}.remote", branch), "origin");
        config.set(
            format!("branch.{}.merge", branch),
            format!("refs/heads/{}", branch),
        );
        config.save()?;
    }

    // Materialize the working tree and index from the fetched tip
    let index = repository.index();
    let mut index = index.lock().await;
    index.rehydrate()?;

    let tree_diff = repository.database().tree_diff(None, Some(&tip))?;
    let mut migration = Migration::new(&repository, &mut index, tree_diff);
    migration.apply_changes()?;
    index.write_updates()?;

    writeln!(repository.writer(), "\nClone completed successfully!")?;
    writeln!(
        repository.writer(),
        "Repository cloned into '{}'",
        directory
    )?;

    Ok(())
}

/// Default clone directory: the last path segment with any `.git` suffix
/// dropped
fn derive_directory(url: &str) -> anyhow::Result<String> {
    let base = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let name = base.strip_suffix(".git").unwrap_or(base);

    if name.is_empty() {
        anyhow::bail!("could not determine directory name from '{}'", url);
    }

    Ok(name.to_string())
}
