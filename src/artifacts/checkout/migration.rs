//! Checkout migration
//!
//! A migration carries the working tree and the index from one commit's
//! snapshot to another's. It runs in two phases: a planning pass that turns
//! the tree diff into file writes, file removals and directory operations
//! while collecting conflicts with local changes, and an apply pass that
//! only runs when the plan came out conflict-free. Nothing is touched on
//! disk before planning succeeds.

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::conflict::ConflictType;
use crate::artifacts::checkout::tree_diff::{TreeChangeType, TreeDiff};
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use crate::artifacts::status::inspector::Inspector;
use anyhow::Context;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

pub struct Migration<'r> {
    repository: &'r Repository,
    tree_diff: TreeDiff<'r>,
    index: &'r mut Index,
    inspector: Inspector<'r>,
    /// Files the target snapshot adds, with the blob to write
    creates: Vec<(PathBuf, DatabaseEntry)>,
    /// Files present in both snapshots whose content or mode changes
    updates: Vec<(PathBuf, DatabaseEntry)>,
    /// Files only the current snapshot has
    removals: Vec<PathBuf>,
    /// Directories that must exist before files are written, parents first
    mkdirs: BTreeSet<PathBuf>,
    /// Directories that may be empty after removals, children last
    rmdirs: BTreeSet<PathBuf>,
    conflicts: BTreeMap<ConflictType, Vec<PathBuf>>,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository, index: &'r mut Index, tree_diff: TreeDiff<'r>) -> Self {
        Self {
            repository,
            index,
            tree_diff,
            inspector: Inspector::new(repository),
            creates: Vec::new(),
            updates: Vec::new(),
            removals: Vec::new(),
            mkdirs: BTreeSet::new(),
            rmdirs: BTreeSet::new(),
            conflicts: BTreeMap::new(),
        }
    }

    pub fn creates(&self) -> &[(PathBuf, DatabaseEntry)] {
        &self.creates
    }

    pub fn updates(&self) -> &[(PathBuf, DatabaseEntry)] {
        &self.updates
    }

    pub fn removals(&self) -> &[PathBuf] {
        &self.removals
    }

    pub fn mkdirs(&self) -> &BTreeSet<PathBuf> {
        &self.mkdirs
    }

    pub fn rmdirs(&self) -> &BTreeSet<PathBuf> {
        &self.rmdirs
    }

    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.plan()?;
        self.apply_planned()
    }

    /// Write the planned changes to the working tree and index
    ///
    /// Callers that need to interleave other work between the conflict
    /// check and the writes (pull does, to settle the ref first) call
    /// `plan` and `apply_planned` separately.
    pub fn apply_planned(&mut self) -> anyhow::Result<()> {
        self.repository.workspace().apply_migration(self)?;
        self.update_index()?;

        Ok(())
    }

    /// Plan the whole migration, failing without side effects on conflicts
    pub fn plan(&mut self) -> anyhow::Result<()> {
        let changes: Vec<(PathBuf, TreeChangeType)> = self
            .tree_diff
            .changes()
            .iter()
            .map(|(path, change)| (path.clone(), change.clone()))
            .collect();

        for (path, change) in &changes {
            self.inspect_for_conflict(path, change)?;
            self.plan_change(path, change);
        }

        let reports = self.conflict_reports();
        if !reports.is_empty() {
            anyhow::bail!("\n{}\n\nAborting", reports.join("\n\n"));
        }

        Ok(())
    }

    fn conflict_reports(&self) -> Vec<String> {
        self.conflicts
            .iter()
            .filter(|(_, paths)| !paths.is_empty())
            .map(|(conflict, paths)| {
                let listing = paths
                    .iter()
                    .map(|path| format!("\t{}", path.display()))
                    .collect::<Vec<_>>()
                    .join("\n");

                format!(
                    "error: {}\n{}\n{}",
                    conflict.header(),
                    listing,
                    conflict.footer()
                )
            })
            .collect()
    }

    /// Would applying `change` at `path` clobber local state?
    ///
    /// Three sources of truth are consulted: the index entry, the working
    /// file's stat, and the diff's two tree entries. A path is conflicting
    /// when the index agrees with neither tree, when the working file has
    /// unstaged changes, or when an untracked file (or a directory hiding
    /// tracked files) sits where the target snapshot needs to write.
    fn inspect_for_conflict(&mut self, path: &Path, change: &TreeChangeType) -> anyhow::Result<()> {
        let index_entry = self.index.entry_by_path(path);

        let (old_entry, new_entry) = match change {
            TreeChangeType::Added(new) => (None, Some(new)),
            TreeChangeType::Deleted(old) => (Some(old), None),
            TreeChangeType::Modified { old, new } => (Some(old), Some(new)),
        };

        let matches_neither_tree = self
            .inspector
            .check_index_against_head_tree(index_entry, old_entry)
            != IndexChangeType::None
            && self
                .inspector
                .check_index_against_head_tree(index_entry, new_entry)
                != IndexChangeType::None;

        if matches_neither_tree {
            self.record_conflict(ConflictType::StaleFile, path);
            return Ok(());
        }

        let stat = self.repository.workspace().stat_file(path).ok();
        let stat = stat.as_ref();
        let conflict = ConflictType::classify(stat, index_entry, new_entry);

        match stat {
            Some(stat) if stat.mode.is_tree() => {
                if self.inspector.is_indirectly_tracked(path, self.index)? {
                    self.record_conflict(conflict, path);
                }
            }
            Some(_) => {
                let workspace_change = self.inspector.check_index_against_workspace(
                    index_entry,
                    stat,
                    self.index.recorded_mtime(),
                )?;
                if workspace_change != WorkspaceChangeType::None {
                    self.record_conflict(conflict, path);
                }
            }
            None => {
                // the file itself is gone; a tracked file higher up the
                // path means a parent directory was replaced by a file
                if let Some(parent) = self.file_blocking_parent(path) {
                    let conflicting = if index_entry.is_some() { path } else { parent };
                    let conflicting = conflicting.to_path_buf();
                    self.record_conflict(conflict, &conflicting);
                }
            }
        }

        Ok(())
    }

    fn record_conflict(&mut self, conflict: ConflictType, path: &Path) {
        self.conflicts
            .entry(conflict)
            .or_default()
            .push(path.to_path_buf());
    }

    /// Nearest ancestor of `path` that exists as a tracked regular file
    fn file_blocking_parent<'p>(&self, path: &'p Path) -> Option<&'p Path> {
        path.parent()?.ancestors().find(|parent| {
            if parent.as_os_str() == "." {
                return false;
            }

            match self.repository.workspace().stat_file(parent) {
                Ok(stat) if stat.mode.is_tree() => false,
                Ok(_) => self
                    .inspector
                    .is_indirectly_tracked(parent, self.index)
                    .unwrap_or_default(),
                Err(_) => false,
            }
        })
    }

    fn plan_change(&mut self, path: &Path, change: &TreeChangeType) {
        match change {
            TreeChangeType::Added(entry) => {
                self.plan_parent_dirs(path, false);
                self.creates.push((path.to_path_buf(), entry.clone()));
            }
            TreeChangeType::Modified { new, .. } => {
                self.plan_parent_dirs(path, false);
                self.updates.push((path.to_path_buf(), new.clone()));
            }
            TreeChangeType::Deleted(_) => {
                self.plan_parent_dirs(path, true);
                self.removals.push(path.to_path_buf());
            }
        }
    }

    fn plan_parent_dirs(&mut self, path: &Path, removal: bool) {
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() || ancestor.is_file() {
                continue;
            }
            if removal {
                self.rmdirs.insert(ancestor.to_path_buf());
            } else {
                self.mkdirs.insert(ancestor.to_path_buf());
            }
        }
    }

    fn update_index(&mut self) -> anyhow::Result<()> {
        for path in &self.removals {
            self.index.remove(path.clone())?;
        }

        for (path, entry) in self.creates.iter().chain(self.updates.iter()) {
            let stat = self.repository.workspace().stat_file(path)?;
            self.index
                .add(IndexEntry::new(path.clone(), entry.oid.clone(), stat))?;
        }

        Ok(())
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let blob = self
            .repository
            .database()
            .parse_object_as_blob(object_id)?
            .with_context(|| format!("Failed to parse blob object {}", object_id))?;

        Ok(blob.content().clone())
    }
}
