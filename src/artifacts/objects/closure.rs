//! Reachability over the object graph
//!
//! Sync transfers whole object graphs: a commit pulls in its tree, a tree
//! pulls in its children, recursively down to blobs. This module computes
//! which objects are reachable from a set of tips, the difference between
//! two such sets (the upload/download frontier), and first-parent ancestry
//! between commits.
//!
//! Traversal is strict: a missing object anywhere in the graph is an error,
//! since a store that is not closed under reachability is corrupt.

use crate::areas::database::Database;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use derive_new::new;
use std::collections::{HashSet, VecDeque};

/// Breadth-first walker over commits, trees and blobs in the database
#[derive(new)]
pub struct ObjectClosure<'d> {
    database: &'d Database,
}

impl ObjectClosure<'_> {
    /// Collect every object reachable from the given tips
    ///
    /// Commits contribute their tree and parent, trees contribute their
    /// children, blobs are leaves. The result is in discovery order and
    /// deduplicated.
    pub fn reachable_from(&self, tips: &[ObjectId]) -> anyhow::Result<Vec<ObjectId>> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut order = Vec::new();

        for tip in tips {
            if visited.insert(tip.clone()) {
                queue.push_back(tip.clone());
            }
        }

        while let Some(oid) = queue.pop_front() {
            match self.database.get_object_type(&oid)? {
                ObjectType::Commit => {
                    let commit = self
                        .database
                        .parse_object_as_commit(&oid)?
                        .with_context(|| format!("object {} is not a commit", oid))?;

                    if visited.insert(commit.tree_oid().clone()) {
                        queue.push_back(commit.tree_oid().clone());
                    }
                    if let Some(parent) = commit.parent()
                        && visited.insert(parent.clone())
                    {
                        queue.push_back(parent.clone());
                    }
                }
                ObjectType::Tree => {
                    let tree = self
                        .database
                        .parse_object_as_tree(&oid)?
                        .with_context(|| format!("object {} is not a tree", oid))?;

                    for (_name, entry) in tree.entries() {
                        if visited.insert(entry.oid.clone()) {
                            queue.push_back(entry.oid.clone());
                        }
                    }
                }
                ObjectType::Blob => {}
            }

            order.push(oid);
        }

        Ok(order)
    }

    /// Collect objects reachable from `want` but not from `have`
    ///
    /// Tips in `have` that are missing from the database are skipped, since
    /// the other side may know commits this side has never seen.
    pub fn difference(
        &self,
        want: &[ObjectId],
        have: &[ObjectId],
    ) -> anyhow::Result<Vec<ObjectId>> {
        let known_have = have
            .iter()
            .filter(|oid| self.database.contains(oid))
            .cloned()
            .collect::<Vec<_>>();
        let excluded = self
            .reachable_from(&known_have)?
            .into_iter()
            .collect::<HashSet<_>>();

        Ok(self
            .reachable_from(want)?
            .into_iter()
            .filter(|oid| !excluded.contains(oid))
            .collect())
    }

    /// Whether `ancestor` lies on the parent chain of `descendant`
    ///
    /// A commit counts as its own ancestor. The walk stops at the root
    /// commit or at the first commit missing from the database.
    pub fn is_ancestor(&self, ancestor: &ObjectId, descendant: &ObjectId) -> anyhow::Result<bool> {
        let mut current = Some(descendant.clone());

        while let Some(oid) = current {
            if &oid == ancestor {
                return Ok(true);
            }
            if !self.database.contains(&oid) {
                break;
            }

            let commit = self
                .database
                .parse_object_as_commit(&oid)?
                .with_context(|| format!("object {} is not a commit", oid))?;
            current = commit.parent().cloned();
        }

        Ok(false)
    }
}
