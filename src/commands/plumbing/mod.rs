//! Plumbing commands (low-level object access)
//!
//! Plumbing commands expose the object database directly. They are the
//! scripting surface underneath the porcelain layer.
//!
//! ## Commands
//!
//! - `cat-file`: pretty-print an object by id
//! - `hash-object`: compute a blob id and optionally store it
//! - `ls-tree`: list the contents of a tree object

pub mod cat_file;
pub mod hash_object;
pub mod ls_tree;

use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::core::error::OrbError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::{MIN_PREFIX_LENGTH, OBJECT_ID_LENGTH};

impl Repository {
    /// Resolve a plumbing target to an object ID
    ///
    /// Accepts a full OID, a unique OID prefix, or anything the revision
    /// parser understands. Unlike revision resolution the result may name
    /// an object of any type, not just a commit.
    pub(crate) fn resolve_object(&self, target: &str) -> anyhow::Result<ObjectId> {
        let is_hex = !target.is_empty() && target.chars().all(|c| c.is_ascii_hexdigit());

        if is_hex && target.len() == OBJECT_ID_LENGTH {
            let oid = ObjectId::try_parse(target.to_string())?;
            if !self.database().contains(&oid) {
                anyhow::bail!(OrbError::NotFound(oid.to_string()));
            }
            return Ok(oid);
        }

        if is_hex && target.len() >= MIN_PREFIX_LENGTH {
            let matches = self.database().find_objects_by_prefix(target)?;
            match matches.len() {
                0 => anyhow::bail!(OrbError::NotFound(target.to_string())),
                1 => return Ok(matches[0].clone()),
                _ => anyhow::bail!("short object id {} is ambiguous", target),
            }
        }

        Revision::try_parse(target)?
            .resolve(self)?
            .ok_or_else(|| OrbError::NotFound(target.to_string()).into())
    }
}
