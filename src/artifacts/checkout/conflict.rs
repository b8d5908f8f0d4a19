//! Checkout conflict classification and user-facing messages

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::index_entry::{EntryMetadata, IndexEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictType {
    StaleFile,
    StaleDirectory,
    UntrackedOverwritten,
    UntrackedRemoved,
}

impl ConflictType {
    /// Classify what a checkout would clobber at a conflicting path
    pub fn classify(
        stat: Option<&EntryMetadata>,
        index_entry: Option<&IndexEntry>,
        target_entry: Option<&DatabaseEntry>,
    ) -> ConflictType {
        if index_entry.is_some() {
            ConflictType::StaleFile
        } else if stat.is_some_and(|stat| stat.mode.is_tree()) {
            ConflictType::StaleDirectory
        } else if target_entry.is_some() {
            ConflictType::UntrackedOverwritten
        } else {
            ConflictType::UntrackedRemoved
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            ConflictType::StaleFile => {
                "Your local changes to the following files would be overwritten by checkout:"
            }
            ConflictType::StaleDirectory => {
                "Updating the following directories would lose untracked files in them:"
            }
            ConflictType::UntrackedOverwritten => {
                "The following untracked working tree files would be overwritten by checkout:"
            }
            ConflictType::UntrackedRemoved => {
                "The following untracked working tree files would be removed by checkout:"
            }
        }
    }

    pub fn footer(&self) -> &'static str {
        match self {
            ConflictType::StaleFile => {
                "Please commit your changes or stash them before you switch branches."
            }
            ConflictType::StaleDirectory => "\n",
            ConflictType::UntrackedOverwritten | ConflictType::UntrackedRemoved => {
                "Please move or remove them before you switch branches."
            }
        }
    }
}
