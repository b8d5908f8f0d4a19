//! Tree object
//!
//! Trees represent directory snapshots. They contain entries for files (blobs)
//! and subdirectories (other trees), along with their names and modes.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry is one text line: `<mode> <kind> <object-id>\t<name>\n`,
//! sorted by entry name. Modes are `100644`, `100755` and `040000`.
//!
//! ## Tree Building
//!
//! Trees can be built from:
//! - Index entries (staging area)
//! - Existing tree objects (for reading)

use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::index::entry_mode::EntryMode;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::Path;

/// Internal tree entry representation
///
/// Can be:
/// - File: A blob reference
/// - Directory: A nested tree
#[derive(Debug, Clone)]
enum TreeEntry {
    /// File entry (blob)
    File(IndexEntry),
    /// Directory entry (nested tree)
    Directory(Tree),
}

impl TreeEntry {
    fn object_type(&self) -> ObjectType {
        match self {
            TreeEntry::File(_) => ObjectType::Blob,
            TreeEntry::Directory(_) => ObjectType::Tree,
        }
    }

    fn mode(&self) -> &EntryMode {
        match self {
            TreeEntry::File(entry) => &entry.metadata.mode,
            TreeEntry::Directory(_) => &EntryMode::Directory,
        }
    }

    fn oid(&self) -> anyhow::Result<ObjectId> {
        match self {
            TreeEntry::File(entry) => Ok(entry.oid.clone()),
            TreeEntry::Directory(tree) => tree.object_id(),
        }
    }
}

/// Tree object representing a directory snapshot
///
/// Trees maintain two sets of entries:
/// - `readable_entries`: For trees loaded from the database
/// - `writeable_entries`: For trees being built from the index
///
/// This dual representation allows efficient reading and writing of tree objects.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    /// Entries loaded from database (read mode)
    readable_entries: BTreeMap<String, DatabaseEntry>,
    /// Entries being built (write mode)
    writeable_entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    /// Build a tree from index entries
    ///
    /// Creates a hierarchical tree structure from a flat list of index entries.
    /// Files are organized into directories matching their path structure.
    ///
    /// # Arguments
    ///
    /// * `entries` - Iterator of index entries to include in the tree
    ///
    /// # Returns
    ///
    /// The root tree object containing all entries
    pub fn build<'e>(entries: impl Iterator<Item = &'e IndexEntry>) -> anyhow::Result<Self> {
        let mut root = Self::default();

        for entry in entries {
            let parents = entry.parent_dirs()?;
            root.add_entry(parents, entry)?;
        }

        Ok(root)
    }

    /// Traverse the tree depth-first, calling a function on each node
    ///
    /// Visits children before parents (post-order traversal), which is
    /// necessary for storing trees since child OIDs must be known before
    /// storing the parent.
    ///
    /// # Arguments
    ///
    /// * `func` - Function to call on each tree node
    pub fn traverse<F>(&self, func: &F) -> anyhow::Result<()>
    where
        F: Fn(&Tree) -> anyhow::Result<()>,
    {
        for entry in &self.writeable_entries {
            if let TreeEntry::Directory(tree) = entry.1 {
                tree.traverse(func)?;
            }
        }
        func(self)?;

        Ok(())
    }

    /// Add an entry to the tree at the appropriate location
    ///
    /// Creates intermediate directory entries as needed.
    fn add_entry(&mut self, parents: Vec<&Path>, entry: &IndexEntry) -> anyhow::Result<()> {
        if parents.is_empty() {
            self.writeable_entries.insert(
                entry.basename()?.to_string(),
                TreeEntry::File(entry.clone()),
            );
        } else {
            let parent = parents[0]
                .file_name()
                .and_then(|s| s.to_str())
                .context("Invalid parent")?
                .to_string();
            let tree = match self.writeable_entries.get_mut(&parent) {
                Some(TreeEntry::Directory(tree)) => tree,
                _ => {
                    let tree = Self::default();
                    self.writeable_entries
                        .insert(parent.clone(), TreeEntry::Directory(tree));

                    match self.writeable_entries.get_mut(&parent) {
                        Some(TreeEntry::Directory(tree)) => tree,
                        _ => unreachable!(),
                    }
                }
            };
            tree.add_entry(parents[1..].to_vec(), entry)?;
        }

        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &DatabaseEntry)> {
        self.readable_entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, DatabaseEntry)> {
        self.readable_entries.into_iter()
    }

    /// Render the entries as payload lines, whichever side is populated
    fn entry_lines(&self) -> anyhow::Result<Vec<String>> {
        if self.readable_entries.is_empty() {
            self.writeable_entries
                .iter()
                .map(|(name, tree_entry)| {
                    Ok(format!(
                        "{} {} {}\t{}",
                        tree_entry.mode().as_str(),
                        tree_entry.object_type().as_str(),
                        tree_entry.oid()?.as_ref(),
                        name
                    ))
                })
                .collect()
        } else {
            Ok(self
                .readable_entries
                .iter()
                .map(|(name, entry)| {
                    let object_type = if entry.is_tree() {
                        ObjectType::Tree
                    } else {
                        ObjectType::Blob
                    };

                    format!(
                        "{} {} {}\t{}",
                        entry.mode.as_str(),
                        object_type.as_str(),
                        entry.oid.as_ref(),
                        name
                    )
                })
                .collect())
        }
    }
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut content_bytes = Vec::new();
        for line in self.entry_lines()? {
            content_bytes.write_all(line.as_bytes())?;
            content_bytes.push(b'\n');
        }

        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), content_bytes.len());
        tree_bytes.write_all(header.as_bytes())?;
        tree_bytes.write_all(&content_bytes)?;

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut entries = BTreeMap::new();

        for line in reader.lines() {
            let line = line?;
            if line.is_empty() {
                continue;
            }

            let (mode_str, rest) = line
                .split_once(' ')
                .context("Invalid tree entry: missing mode")?;
            let (_kind, rest) = rest
                .split_once(' ')
                .context("Invalid tree entry: missing object type")?;
            let (oid, name) = rest
                .split_once('\t')
                .context("Invalid tree entry: missing name")?;

            let mode = EntryMode::from_octal_str(mode_str)?;
            let oid = ObjectId::try_parse(oid.to_string())?;

            entries.insert(name.to_string(), DatabaseEntry::new(oid, mode));
        }

        Ok(Tree {
            readable_entries: entries,
            writeable_entries: Default::default(),
        })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entry_lines().unwrap_or_default().join("\n")
    }
}
