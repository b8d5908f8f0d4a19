//! Repository handle
//!
//! Ties the four areas (workspace, index, database, refs) together with the
//! configuration and the output writer. Commands are implemented as methods
//! on this type.

use crate::areas::config::Config;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::SymRefName;
use crate::artifacts::database::database_entry::DatabaseEntry;
use crate::artifacts::objects::object_id::ObjectId;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Name of the repository metadata directory
pub const ORB_DIR_NAME: &str = ".orb";

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
    config: RefCell<Config>,
    current_ref: RefCell<SymRefName>,
    reverse_refs: RefCell<HashMap<ObjectId, Vec<SymRefName>>>,
}

impl Repository {
    pub fn new(path: impl AsRef<Path>, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let orb_path = path.join(ORB_DIR_NAME);
        let index = Index::new(orb_path.join("index").into_boxed_path());
        let database = Database::new(orb_path.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(orb_path.clone().into_boxed_path());
        let config = Config::load(orb_path.join("config").into_boxed_path())?;
        let current_ref = refs.current_ref(None)?;

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
            config: RefCell::new(config),
            current_ref: RefCell::new(current_ref),
            reverse_refs: RefCell::new(HashMap::new()),
        })
    }

    /// Open the repository that contains `start`
    ///
    /// Walks up from `start` until a directory holding `.orb` is found.
    pub fn discover(
        start: impl AsRef<Path>,
        writer: Box<dyn std::io::Write>,
    ) -> anyhow::Result<Self> {
        let start = start.as_ref().canonicalize()?;

        let mut current = start.as_path();
        loop {
            if current.join(ORB_DIR_NAME).is_dir() {
                return Repository::new(current, writer);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => anyhow::bail!(
                    "not an orb repository (or any of the parent directories): {}",
                    ORB_DIR_NAME
                ),
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn orb_path(&self) -> PathBuf {
        self.path.join(ORB_DIR_NAME)
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn config(&self) -> Ref<'_, Config> {
        self.config.borrow()
    }

    pub fn config_mut(&self) -> RefMut<'_, Config> {
        self.config.borrow_mut()
    }

    pub fn current_ref(&self) -> Ref<'_, SymRefName> {
        self.current_ref.borrow()
    }

    pub fn set_current_ref(&self, new_ref: SymRefName) {
        *self.current_ref.borrow_mut() = new_ref;
    }

    pub fn reverse_refs(&self) -> Ref<'_, HashMap<ObjectId, Vec<SymRefName>>> {
        self.reverse_refs.borrow()
    }

    pub fn set_reverse_refs(&self, new_reverse_refs: HashMap<ObjectId, Vec<SymRefName>>) {
        *self.reverse_refs.borrow_mut() = new_reverse_refs;
    }

    /// Flatten a tree into a path to entry map, recursing through subtrees
    pub fn flatten_tree(
        &self,
        tree_oid: &ObjectId,
        prefix: &Path,
        entries: &mut BTreeMap<PathBuf, DatabaseEntry>,
    ) -> anyhow::Result<()> {
        let tree = self
            .database
            .parse_object_as_tree(tree_oid)?
            .ok_or_else(|| anyhow::anyhow!("object {} is not a tree", tree_oid))?;

        for (name, entry) in tree.into_entries() {
            let entry_path = prefix.join(name);

            if entry.is_tree() {
                self.flatten_tree(&entry.oid, &entry_path, entries)?;
            } else {
                entries.insert(entry_path, entry);
            }
        }

        Ok(())
    }
}
