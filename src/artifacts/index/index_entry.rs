//! Index entry representation
//!
//! Each entry in the index represents a tracked file with:
//! - File path
//! - Content hash (object ID)
//! - File metadata (mode, size, mtime)
//!
//! ## Entry Format
//!
//! On disk an entry is a single text line, `<object-id> <path>`. Only the
//! hash and the path persist; metadata is rebuilt from the workspace when
//! the index is rehydrated, so mode and timestamps reflect the files as
//! they currently are.

use crate::artifacts::index::entry_mode::{EntryMode, FileMode};
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;
use is_executable::IsExecutable;
use std::fs::Metadata;
use std::os::unix::prelude::MetadataExt;
use std::path::{Path, PathBuf};

/// Index entry representing a tracked file
///
/// Contains the file path, content hash, and metadata needed for
/// building trees and applying checkouts.
#[derive(Debug, Clone, Default, new)]
pub struct IndexEntry {
    /// File path relative to repository root
    pub name: PathBuf,
    /// SHA-1 hash of file content
    pub oid: ObjectId,
    /// File metadata (mode, size, mtime)
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    pub fn basename(&self) -> anyhow::Result<&str> {
        self.name
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name"))
    }

    pub fn parent_dirs(&self) -> anyhow::Result<Vec<&Path>> {
        let mut dirs = Vec::new();
        let mut parent = self.name.parent();

        while let Some(new_parent) = parent {
            dirs.push(new_parent);
            parent = new_parent.parent();
        }
        dirs.reverse();
        let dirs = dirs[1..].to_vec();

        Ok(dirs)
    }

    /// Render the entry as its on-disk index line (without the newline)
    pub fn to_index_line(&self) -> anyhow::Result<String> {
        let name = self
            .name
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Invalid entry name"))?;

        Ok(format!("{} {}", self.oid.as_ref(), name))
    }

    /// Parse an entry from its on-disk index line
    pub fn from_index_line(line: &str) -> anyhow::Result<Self> {
        let (oid, name) = line
            .split_once(' ')
            .ok_or_else(|| anyhow::anyhow!("Invalid index entry line: {}", line))?;

        if name.is_empty() {
            return Err(anyhow::anyhow!("Invalid index entry line: {}", line));
        }
        let oid = ObjectId::try_parse(oid.to_string())?;

        Ok(Self::new(PathBuf::from(name), oid, Default::default()))
    }
}

impl PartialEq for IndexEntry {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for IndexEntry {}

impl PartialOrd for IndexEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for IndexEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.name.cmp(&other.name)
    }
}

/// File metadata carried by index entries
///
/// Rebuilt from the workspace on rehydrate rather than persisted, since the
/// index file stores only hashes and paths. The mode feeds tree building and
/// checkout, size and mtime feed status change detection.
#[derive(Debug, Clone, Default)]
pub struct EntryMetadata {
    /// File size in bytes
    pub size: u64,
    /// File mode (permissions and type)
    pub mode: EntryMode,
    /// Modification time (seconds since Unix epoch)
    pub mtime: i64,
    /// Modification time nanoseconds
    pub mtime_nsec: i64,
}

impl TryFrom<(&Path, Metadata)> for EntryMetadata {
    type Error = anyhow::Error;

    fn try_from((file_path, metadata): (&Path, Metadata)) -> Result<Self, Self::Error> {
        let mode = if metadata.is_dir() {
            EntryMode::Directory
        } else {
            match file_path.is_executable() {
                true => EntryMode::File(FileMode::Executable),
                false => EntryMode::File(FileMode::Regular),
            }
        };

        Ok(Self {
            size: metadata.size(),
            mode,
            mtime: metadata.mtime(),
            mtime_nsec: metadata.mtime_nsec(),
        })
    }
}
