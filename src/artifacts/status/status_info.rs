//! Status aggregation
//!
//! Builds the three changesets the `status` command prints: staged changes
//! (index vs HEAD tree), unstaged changes (working tree vs index) and
//! untracked files. The working tree is compared by stat heuristic only,
//! through [`Inspector`].

use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::EntryMetadata;
use crate::artifacts::status::file_change::{
    FileChange, FileChangeType, IndexChangeType, WorkspaceChangeType,
};
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub type ChangeSet = BTreeMap<PathBuf, FileChangeType>;

/// The three sections of a status report, each sorted by path
#[derive(Debug, Clone)]
pub struct StatusInfo {
    pub(crate) untracked_changeset: ChangeSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) index_changeset: ChangeSet,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub async fn initialize(&self, index: &mut Index) -> anyhow::Result<StatusInfo> {
        let inspector = Inspector::new(self.repository);

        let mut file_stats = BTreeMap::new();
        let mut untracked_changeset = ChangeSet::new();
        self.scan_workspace(index, &inspector, &mut file_stats, &mut untracked_changeset)?;

        let head_tree = self.load_head_tree()?;
        let changes = self.classify_entries(index, &inspector, &file_stats, &head_tree)?;

        let workspace_changeset = changes
            .iter()
            .filter(|(_, change)| change.workspace_change != WorkspaceChangeType::None)
            .map(|(path, change)| {
                (
                    path.clone(),
                    FileChangeType::Workspace(change.workspace_change.clone()),
                )
            })
            .collect();
        let index_changeset = changes
            .iter()
            .filter(|(_, change)| change.index_change != IndexChangeType::None)
            .map(|(path, change)| {
                (
                    path.clone(),
                    FileChangeType::Index(change.index_change.clone()),
                )
            })
            .collect();

        Ok(StatusInfo {
            untracked_changeset,
            workspace_changeset,
            index_changeset,
        })
    }

    /// Walk the working tree, collecting stats for tracked files and the
    /// untracked set
    ///
    /// Untracked directories collapse to a single `dir/` entry, so the
    /// walk does not descend into them beyond the tracked-content probe.
    fn scan_workspace(
        &self,
        index: &Index,
        inspector: &Inspector<'_>,
        file_stats: &mut BTreeMap<PathBuf, EntryMetadata>,
        untracked: &mut ChangeSet,
    ) -> anyhow::Result<()> {
        let mut pending = vec![None::<PathBuf>];

        while let Some(prefix) = pending.pop() {
            let paths = self.repository.workspace().list_dir(prefix.as_deref())?;

            for path in paths {
                if index.is_directly_tracked(&path) {
                    if path.is_dir() {
                        pending.push(Some(path));
                    } else {
                        let stat = self.repository.workspace().stat_file(&path)?;
                        file_stats.insert(path, stat);
                    }
                } else if !inspector.is_indirectly_tracked(&path, index)? {
                    let display_path = if path.is_dir() {
                        path.join("") // trailing separator marks directories
                    } else {
                        path
                    };
                    untracked.insert(display_path, FileChangeType::Untracked);
                }
            }
        }

        Ok(())
    }

    fn load_head_tree(&self) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        let mut head_tree = BTreeMap::new();

        if let Some(head_oid) = self.repository.refs().read_head()?
            && let Some(commit) = self.repository.database().parse_object_as_commit(&head_oid)?
        {
            self.repository
                .flatten_tree(commit.tree_oid(), Path::new(""), &mut head_tree)?;
        }

        Ok(head_tree)
    }

    /// Compare every index entry against the workspace and the HEAD tree,
    /// then sweep the HEAD tree for files deleted from the index
    fn classify_entries(
        &self,
        index: &Index,
        inspector: &Inspector<'_>,
        file_stats: &BTreeMap<PathBuf, EntryMetadata>,
        head_tree: &BTreeMap<PathBuf, DatabaseEntry>,
    ) -> anyhow::Result<BTreeMap<PathBuf, FileChange>> {
        let mut changes = BTreeMap::<PathBuf, FileChange>::new();

        for entry in index.entries() {
            let workspace_change = inspector.check_index_against_workspace(
                Some(entry),
                file_stats.get(&entry.name),
                index.recorded_mtime(),
            )?;
            if workspace_change != WorkspaceChangeType::None {
                changes.entry(entry.name.clone()).or_default().workspace_change =
                    workspace_change;
            }

            let index_change = inspector
                .check_index_against_head_tree(Some(entry), head_tree.get(&entry.name));
            if index_change != IndexChangeType::None {
                changes.entry(entry.name.clone()).or_default().index_change = index_change;
            }
        }

        for path in head_tree.keys() {
            if !index.is_directly_tracked(path) {
                changes.entry(path.clone()).or_default().index_change = IndexChangeType::Deleted;
            }
        }

        Ok(changes)
    }
}
