//! Index (staging area)
//!
//! The index tracks which files should be included in the next commit.
//! On disk it is a plain text file, one `<object-id> <path>` line per staged
//! file, sorted by path. Metadata (mode, size, mtime) is not persisted; it is
//! rebuilt from the workspace when needed.
//!
//! ## Data Structures
//!
//! - `entries`: Maps file paths to their index entries
//! - `children`: Maps directory paths to their children for efficient tree operations
//!
//! ## Atomicity
//!
//! Updates are written to `.orb/index.lock` and renamed over `.orb/index`
//! while holding an exclusive advisory lock, so readers always see a
//! complete index and concurrent writers serialize (last writer wins).

use crate::areas::workspace::Workspace;
use crate::artifacts::index::index_entry::IndexEntry;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Read, Write};
use std::ops::DerefMut;
use std::os::unix::prelude::MetadataExt;
use std::path::{Path, PathBuf};

/// Index (staging area)
///
/// Tracks files staged for the next commit. The in-memory form keeps a
/// parent-to-children map alongside the entries so that file/directory
/// conflicts can be evicted cheaply.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.orb/index`)
    path: Box<Path>,
    /// Tracked files mapped by path
    entries: BTreeMap<Box<Path>, IndexEntry>,
    /// Directory hierarchy for efficient parent-child lookups
    children: BTreeMap<Box<Path>, BTreeSet<Box<Path>>>,
    /// Mtime of the index file when it was last loaded
    recorded_mtime: i64,
    /// Flag indicating if the index has been modified since loading
    changed: bool,
}

impl Index {
    /// Create a new empty index
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the index file (typically `.orb/index`)
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            recorded_mtime: 0,
            changed: false,
        }
    }

    /// Get the path to the index file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mtime of the index file as of the last rehydrate
    ///
    /// Workspace files modified after this instant are stale candidates for
    /// status checks.
    pub fn recorded_mtime(&self) -> i64 {
        self.recorded_mtime
    }

    /// Look up an entry by its path
    ///
    /// # Returns
    ///
    /// The index entry if found, None otherwise
    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Clear all entries from the index
    fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.changed = false;
    }

    /// Load the index from disk
    ///
    /// Reads the index file and parses one entry per line. Malformed lines
    /// are skipped. If the file doesn't exist it is created empty.
    ///
    /// # Locking
    ///
    /// Acquires a shared lock on the index file during reading.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        if !self.path().exists() {
            self.clear();
            // create the index file
            std::fs::File::create(self.path())?;
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(self.path())?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        self.clear();

        let metadata = lock.deref_mut().metadata()?;
        self.recorded_mtime = metadata.mtime();

        // if the index file is empty, return early
        if metadata.len() == 0 {
            return Ok(());
        }

        let mut content = String::new();
        lock.deref_mut().read_to_string(&mut content)?;

        for line in content.lines() {
            if let Ok(entry) = IndexEntry::from_index_line(line) {
                self.store_entry(&entry)?;
            }
        }

        Ok(())
    }

    /// Rebuild entry metadata from the workspace
    ///
    /// The on-disk index carries only hashes and paths, so modes and stat
    /// info must be re-read before building trees or applying checkouts.
    /// Entries whose file is gone keep default metadata.
    pub fn refresh_metadata(&mut self, workspace: &Workspace) {
        for entry in self.entries.values_mut() {
            if let Ok(stat) = workspace.stat_file(&entry.name) {
                entry.metadata = stat;
            }
        }
    }

    /// Check if a path is tracked directly in the index
    ///
    /// Returns true if the path is either a file entry or has children
    /// (is a directory with tracked files).
    pub fn is_directly_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path) || self.children.contains_key(path)
    }

    /// Remove any conflicting entries before adding a new entry
    ///
    /// Removes parent directories that might be file entries, and
    /// removes any children entries if this entry is becoming a file.
    fn discard_conflicts(&mut self, entry: &IndexEntry) -> anyhow::Result<()> {
        entry
            .parent_dirs()?
            .into_iter()
            .map(|parent| self.remove_entry(parent))
            .collect::<Result<Vec<_>, _>>()?;
        self.remove_children(&entry.name)
    }

    fn store_entry(&mut self, entry: &IndexEntry) -> anyhow::Result<()> {
        let entry_parents = entry
            .parent_dirs()?
            .into_iter()
            .map(|parent| parent.to_owned().into_boxed_path())
            .collect::<BTreeSet<_>>();

        self.entries
            .insert(entry.name.clone().into_boxed_path(), entry.clone());

        for parent in entry_parents {
            self.children
                .entry(parent.clone())
                .or_default()
                .insert(entry.name.clone().into_boxed_path());
        }

        Ok(())
    }

    fn remove_children(&mut self, path_name: &Path) -> anyhow::Result<()> {
        if let Some(children) = self.children.remove(path_name) {
            for child in children {
                self.remove_entry(&child)?;
            }
        }

        Ok(())
    }

    fn remove_entry(&mut self, path_name: &Path) -> anyhow::Result<()> {
        match self.entries.remove(path_name) {
            None => Ok(()),
            Some(entry) => {
                entry
                    .parent_dirs()?
                    .into_iter()
                    .map(|parent| parent.to_owned().into_boxed_path())
                    .for_each(|parent| {
                        if let Some(children) = self.children.get_mut(&parent) {
                            children.remove(path_name);
                            if children.is_empty() {
                                self.children.remove(&parent);
                            }
                        }
                    });

                Ok(())
            }
        }
    }

    pub fn add(&mut self, entry: IndexEntry) -> anyhow::Result<()> {
        self.discard_conflicts(&entry)?;
        self.store_entry(&entry)?;

        self.changed = true;

        Ok(())
    }

    pub fn remove(&mut self, path: PathBuf) -> anyhow::Result<()> {
        self.remove_entry(&path)?;
        self.remove_children(&path)?;

        self.changed = true;

        Ok(())
    }

    /// Persist the index to disk
    ///
    /// Serializes all entries to `.orb/index.lock` and renames it over the
    /// index file. The exclusive lock on the index file serializes writers;
    /// the rename keeps the swap atomic for readers.
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(self.path())?;
        let _lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)?;

        let mut content = Vec::new();
        for entry in self.entries.values() {
            writeln!(content, "{}", entry.to_index_line()?)?;
        }

        let lock_path = self.lock_path();
        std::fs::write(&lock_path, &content)?;
        std::fs::rename(&lock_path, self.path())?;

        self.changed = false;

        Ok(())
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn into_entries(self) -> impl Iterator<Item = IndexEntry> {
        self.entries.into_values()
    }

    pub fn entries_under_path(&self, path: &Path) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|entry_path| {
                // If path is ".", include all entries
                if path == Path::new(".") {
                    return true;
                }
                // Otherwise, check if the entry is under the given path
                entry_path.starts_with(path) || entry_path.as_ref() == path
            })
            .map(|p| p.to_path_buf())
            .collect()
    }
}
