//! References (branches, HEAD, tags)
//!
//! This module manages references, the human-readable names pointing to commits.
//! References can be:
//! - Direct: Containing a commit SHA-1
//! - Symbolic: Pointing to another reference (e.g., HEAD -> refs/heads/main)
//!
//! ## Reference Types
//!
//! - HEAD: Special reference pointing to the current branch or commit
//! - Branches: refs/heads/* pointing to branch tip commits
//! - Tags: refs/tags/* pointing to tagged commits
//!
//! ## File Format
//!
//! References are stored as newline-terminated text files containing either:
//! - A 40-character SHA-1 hash (direct reference)
//! - `ref: <path>` for symbolic references
//!
//! Writes go through a `<ref>.lock` sibling that is renamed into place, so
//! a reference file never holds a half-written value.

use crate::artifacts::branch::branch_name::{BranchName, SymRefName};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// References manager
///
/// Handles reading and writing references (branches, HEAD, tags).
/// Provides safe concurrent access through file locking.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the refs directory (typically `.orb`)
    path: Box<Path>,
}

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

/// Outcome of a compare-and-swap reference update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasResult {
    /// The reference was updated
    Updated,
    /// The reference no longer holds the expected value
    Conflict { actual: Option<ObjectId> },
}

/// Internal representation of a reference value
///
/// Can be either a symbolic reference or a direct object ID.
#[derive(Debug, Clone)]
enum SymRefOrOid {
    /// Symbolic reference pointing to another ref
    SymRef { sym_ref_name: SymRefName },
    /// Direct object ID
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: SymRefName::new(symref_match[1].to_string()),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Check if a branch is the currently checked-out branch
    ///
    /// # Arguments
    ///
    /// * `branch_name` - The branch to check
    ///
    /// # Returns
    ///
    /// true if the branch is current, false otherwise
    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        let current_ref = self.current_ref(None)?;

        Ok(branch_name == &BranchName::try_parse_sym_ref_name(&current_ref)?)
    }

    /// Read the object ID that a symbolic reference points to
    ///
    /// Follows symbolic references recursively until reaching a direct OID.
    ///
    /// # Returns
    ///
    /// Some(ObjectId) if the ref exists and points to a commit, None otherwise
    pub fn read_oid(&self, sym_ref_name: &SymRefName) -> anyhow::Result<Option<ObjectId>> {
        self.read_ref(BranchName::try_parse_sym_ref_name(sym_ref_name)?)
    }

    /// Get the current symbolic reference
    ///
    /// Follows symbolic references recursively to find the final direct reference.
    /// For example, if HEAD points to refs/heads/main, returns refs/heads/main.
    ///
    /// # Arguments
    ///
    /// * `source` - Starting reference (defaults to HEAD if None)
    ///
    /// # Returns
    ///
    /// The final symbolic reference in the chain
    pub fn current_ref(&self, source: Option<SymRefName>) -> anyhow::Result<SymRefName> {
        let source = source.unwrap_or_else(|| SymRefName::new(HEAD_REF_NAME.to_string()));

        let ref_content =
            SymRefOrOid::read_symref_or_oid(self.path.join(source.as_ref_path()).as_path())?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => Ok(self.current_ref(Some(sym_ref_name))?),
            Some(_) | None => Ok(source),
        }
    }

    /// Read a symbolic reference, following indirection
    ///
    /// Recursively follows symbolic references until finding an OID.
    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                self.read_symref(self.path.join(sym_ref_name.as_ref_path()).as_path())
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// Update a symbolic reference to point to a new commit
    ///
    /// Follows the symref chain and rewrites the final target. A missing
    /// final target is created, which is how the first commit materializes
    /// the default branch file.
    fn update_symref(&self, path: &Path, oid: ObjectId) -> anyhow::Result<()> {
        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                let target_path = self.path.join(sym_ref_name.as_ref_path());
                self.update_symref(target_path.as_path(), oid)
            }
            Some(SymRefOrOid::Oid(_)) | None => self.update_ref_file(
                path.to_path_buf().into_boxed_path(),
                oid.as_ref().to_string(),
            ),
        }
    }

    pub fn set_head(&self, revision: &str, raw_ref: String) -> anyhow::Result<()> {
        let revision_path = self.heads_path().join(revision).into_boxed_path();

        if revision_path.exists() {
            self.update_ref_file(self.head_path(), format!("ref: refs/heads/{}", revision))
        } else {
            self.update_ref_file(self.head_path(), raw_ref)
        }
    }

    pub fn update_head(&self, oid: ObjectId) -> anyhow::Result<()> {
        self.update_symref(self.head_path().as_ref(), oid)
    }

    pub fn read_head(&self) -> anyhow::Result<Option<ObjectId>> {
        self.read_symref(&self.head_path())
    }

    /// Write a reference file atomically
    ///
    /// Takes an exclusive lock on the reference, writes the new value to a
    /// `<ref>.lock` sibling and renames it into place.
    pub fn update_ref_file(&self, path: Box<Path>, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let mut ref_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path.clone())
            .with_context(|| format!("failed to open ref file at {:?}", path))?;
        let _lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;

        let lock_path = Self::ref_lock_path(&path);
        std::fs::write(&lock_path, format!("{}\n", raw_ref).as_bytes())
            .with_context(|| format!("failed to write ref lock file at {:?}", lock_path))?;
        std::fs::rename(&lock_path, path.as_ref())
            .with_context(|| format!("failed to rename ref lock file to {:?}", path))?;

        Ok(())
    }

    /// Atomically update a branch only if it still holds the expected value
    ///
    /// `expected` of None means the branch must not exist yet. The current
    /// value is re-read under the exclusive lock, so two racing updates
    /// serialize and the loser sees a conflict.
    pub fn compare_and_swap(
        &self,
        branch_name: &BranchName,
        expected: Option<&ObjectId>,
        new_oid: &ObjectId,
    ) -> anyhow::Result<CasResult> {
        let branch_path = self
            .heads_path()
            .join(branch_name.as_ref())
            .into_boxed_path();

        std::fs::create_dir_all(branch_path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                branch_path
            )
        })?)?;

        let mut options = std::fs::OpenOptions::new();
        options.read(true).write(true);
        if expected.is_none() {
            options.create(true);
        }

        let mut ref_file = match options.open(branch_path.as_ref()) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CasResult::Conflict { actual: None });
            }
            Err(e) => {
                return Err(anyhow::Error::from(e)
                    .context(format!("failed to open ref file at {:?}", branch_path)));
            }
        };
        let _lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;

        // re-read under the lock
        let actual = match SymRefOrOid::read_symref_or_oid(branch_path.as_ref())? {
            Some(SymRefOrOid::Oid(oid)) => Some(oid),
            _ => None,
        };

        if actual.as_ref() != expected {
            return Ok(CasResult::Conflict { actual });
        }

        let lock_path = Self::ref_lock_path(&branch_path);
        std::fs::write(&lock_path, format!("{}\n", new_oid.as_ref()).as_bytes())
            .with_context(|| format!("failed to write ref lock file at {:?}", lock_path))?;
        std::fs::rename(&lock_path, branch_path.as_ref())
            .with_context(|| format!("failed to rename ref lock file to {:?}", branch_path))?;

        Ok(CasResult::Updated)
    }

    fn ref_lock_path(path: &Path) -> PathBuf {
        let mut lock_path = path.as_os_str().to_owned();
        lock_path.push(".lock");
        PathBuf::from(lock_path)
    }

    pub fn read_ref(&self, branch_name: BranchName) -> anyhow::Result<Option<ObjectId>> {
        let ref_path = self.find_path_to_branch(branch_name)?;
        self.read_symref(&ref_path)
    }

    fn find_path_to_branch(&self, branch_name: BranchName) -> anyhow::Result<Box<Path>> {
        // search for the branch ref file in .orb, .orb/refs and .orb/refs/heads
        [self.path.clone(), self.refs_path(), self.heads_path()]
            .iter()
            .map(|base_path| base_path.join(branch_name.as_ref()).into_boxed_path())
            .find(|path| path.exists())
            .ok_or_else(|| anyhow::anyhow!("branch {} not found", branch_name))
    }

    pub fn create_branch(&self, name: BranchName, source_oid: ObjectId) -> anyhow::Result<()> {
        let branch_path = self.heads_path().join(name.as_ref()).into_boxed_path();

        // check whether another branch with the same name already exists
        if branch_path.exists() {
            anyhow::bail!("branch {} already exists", name);
        }

        self.update_ref_file(branch_path, source_oid.as_ref().into())
    }

    pub fn list_branches(&self) -> anyhow::Result<Vec<SymRefName>> {
        self.list_refs(self.heads_path().as_ref())
    }

    /// All refs under `refs/` paired with the commit they resolve to,
    /// sorted by ref name
    pub fn list_refs_with_oids(&self) -> anyhow::Result<Vec<(SymRefName, ObjectId)>> {
        let mut refs = self
            .list_refs(self.refs_path().as_ref())?
            .into_iter()
            .filter_map(|sym_ref| match self.read_oid(&sym_ref) {
                Ok(Some(oid)) => Some((sym_ref, oid)),
                _ => None,
            })
            .collect::<Vec<_>>();
        refs.sort_by(|a, b| a.0.as_ref_path().cmp(b.0.as_ref_path()));

        Ok(refs)
    }

    fn list_refs(&self, path: &Path) -> anyhow::Result<Vec<SymRefName>> {
        Ok(WalkDir::new(path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                if entry.path().is_file() {
                    let relative_path = entry.path().strip_prefix(self.path.as_ref()).ok()?;
                    Some(SymRefName::new(relative_path.to_string_lossy().to_string()))
                } else {
                    None
                }
            })
            .collect::<Vec<_>>())
    }

    pub fn reverse_refs(&self) -> anyhow::Result<HashMap<ObjectId, Vec<SymRefName>>> {
        Ok(self
            .list_all_refs()?
            .into_iter()
            .fold(HashMap::new(), |mut acc, sym_ref| {
                if let Ok(Some(oid)) = self.read_oid(&sym_ref) {
                    acc.entry(oid).or_insert_with(Vec::new).push(sym_ref);
                }
                acc
            }))
    }

    fn list_all_refs(&self) -> anyhow::Result<Vec<SymRefName>> {
        Ok(self
            .list_refs(self.refs_path().as_ref())?
            .into_iter()
            .chain(std::iter::once(SymRefName::new(HEAD_REF_NAME.to_string())))
            .collect::<Vec<_>>())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }

    pub fn tags_path(&self) -> Box<Path> {
        self.refs_path().join("tags").into_boxed_path()
    }
}
