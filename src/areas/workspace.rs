//! Working tree access
//!
//! The workspace is the user-visible file tree that surrounds `.orb`. All
//! reads and writes of tracked files go through here, so path filtering and
//! checkout migrations live in one place.

use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_blob(&self, path: &Path) -> anyhow::Result<Blob> {
        let data = self.read_file(path)?;
        Ok(Blob::new(data, Default::default()))
    }

    pub fn list_dir(&self, dir_path: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
        let dir_path = match dir_path {
            Some(p) => std::fs::canonicalize(p)?,
            None => self.path.clone().into(),
        };

        // Check if the dir_path exists
        if !dir_path.exists() {
            anyhow::bail!("The specified path does not exist: {:?}", dir_path);
        }

        if dir_path.is_dir() {
            Ok(std::fs::read_dir(&dir_path)?
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| self.check_if_not_ignored_path(&entry.path()))
                .collect::<Vec<_>>())
        } else {
            anyhow::bail!("The specified path is not a directory: {:?}", dir_path);
        }
    }

    // TODO: refactor to use iterator
    pub fn list_files(&self, root_file_path: Option<PathBuf>) -> anyhow::Result<Vec<PathBuf>> {
        let root_file_path = match root_file_path {
            Some(p) => std::fs::canonicalize(p)?,
            None => self.path.clone().into(),
        };

        // Check if the root_file_path exists
        if !root_file_path.exists() {
            anyhow::bail!("The specified path does not exist: {:?}", root_file_path);
        }

        if root_file_path.is_dir() {
            Ok(WalkDir::new(&root_file_path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| self.check_if_not_ignored_file_path(entry.path()))
                .collect::<Vec<_>>())
        } else {
            Ok(vec![
                root_file_path
                    .strip_prefix(self.path.as_ref())
                    .map(PathBuf::from)
                    .unwrap_or_default(),
            ])
        }
    }

    /// Hidden entries are invisible to tracking
    ///
    /// Any path component starting with a dot is skipped, which keeps `.orb`
    /// itself out of its own history.
    fn is_ignored(path: &Path) -> bool {
        path.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                name.to_string_lossy().starts_with('.')
            } else {
                false
            }
        })
    }

    fn check_if_not_ignored_path(&self, path: &Path) -> Option<PathBuf> {
        let relative_path = path.strip_prefix(self.path.as_ref()).ok()?;
        if !Self::is_ignored(relative_path) {
            Some(relative_path.to_path_buf())
        } else {
            None
        }
    }

    fn check_if_not_ignored_file_path(&self, path: &Path) -> Option<PathBuf> {
        if !path.is_file() {
            return None;
        }
        self.check_if_not_ignored_path(path)
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let file_path = self.path.join(file_path);

        let content = std::fs::read(file_path)?;

        Ok(Bytes::from(content))
    }

    pub fn stat_file(&self, file_path: &Path) -> anyhow::Result<EntryMetadata> {
        let metadata = std::fs::metadata(self.path.join(file_path))?;

        (file_path, metadata).try_into()
    }

    /// Apply a planned checkout migration to the working tree
    ///
    /// Removals run first, then empty directories are dropped deepest
    /// first, directories for incoming files are created parents first,
    /// and finally updated and new file contents are written.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for path in migration.removals() {
            self.clear_path(path)?;
        }

        for dir_path in migration.rmdirs().iter().rev() {
            self.remove_directory(dir_path)?;
        }

        for dir_path in migration.mkdirs() {
            self.make_directory(dir_path)?;
        }

        for (path, entry) in migration.updates().iter().chain(migration.creates()) {
            self.clear_path(path)?;
            self.write_migrated_file(migration, path, entry)?;
        }

        Ok(())
    }

    /// Remove whatever currently occupies `path`, file or directory
    fn clear_path(&self, file_path: &Path) -> anyhow::Result<()> {
        let path = self.path.join(file_path);

        if !path.exists() {
            return Ok(());
        }

        let metadata = std::fs::metadata(&path)
            .with_context(|| format!("Failed to get metadata for file: {:?}", file_path))?;

        if metadata.is_dir() {
            std::fs::remove_dir_all(&path)
                .with_context(|| format!("Failed to remove existing directory: {:?}", file_path))?;
        } else {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        Ok(())
    }

    fn write_migrated_file(
        &self,
        migration: &Migration,
        file_path: &Path,
        entry: &DatabaseEntry,
    ) -> anyhow::Result<()> {
        let data = migration.load_blob_data(&entry.oid)?;
        let path = self.path.join(file_path);

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;
        file.write_all(&data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(entry.mode.as_u32());
            std::fs::set_permissions(&path, permissions)
                .with_context(|| format!("Failed to set permissions for file: {:?}", file_path))?;
        }

        Ok(())
    }

    fn remove_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        let dir_path = self.path.join(dir_path);

        // only an empty directory goes away; anything still inside wins
        let _ = std::fs::remove_dir(dir_path);

        Ok(())
    }

    fn make_directory(&self, dir_path: &Path) -> anyhow::Result<()> {
        let dir_path = self.path.join(dir_path);

        if !dir_path.exists() {
            std::fs::create_dir(&dir_path)?;
            return Ok(());
        }

        let metadata = std::fs::metadata(&dir_path)?;
        // delete existing file if it's a file
        if metadata.is_file() {
            std::fs::remove_file(&dir_path)?;
        }

        if !metadata.is_dir() {
            std::fs::create_dir(dir_path)?;
        }

        Ok(())
    }
}
