use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use derive_new::new;

/// Commit history walker
///
/// Iterates from a starting revision back through parents, yielding each
/// commit together with its ID. A parent missing from the database ends
/// the walk with a warning on stderr, which can happen after fetching only
/// part of a remote history.
#[derive(Clone, new)]
pub struct RevList<'r> {
    repository: &'r Repository,
    start_revision: Revision,
    quiet: bool,
}

impl<'r> RevList<'r> {
    pub fn into_iter(self) -> anyhow::Result<RevListIntoIter<'r>> {
        Ok(RevListIntoIter {
            repository: self.repository,
            current_commit_oid: self.start_revision.resolve(self.repository)?,
            quiet: self.quiet,
        })
    }
}

#[derive(Clone)]
pub struct RevListIntoIter<'r> {
    repository: &'r Repository,
    current_commit_oid: Option<ObjectId>,
    quiet: bool,
}

impl Iterator for RevListIntoIter<'_> {
    type Item = (ObjectId, Commit);

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.current_commit_oid.take()?;

        let commit = match self
            .repository
            .database()
            .parse_object_as_commit(&commit_oid)
        {
            Ok(Some(commit)) => commit,
            // If we can't parse the commit, end the iteration
            _ => return None,
        };

        // Move to the parent commit for the next iteration, stopping early
        // when the parent has not been fetched
        self.current_commit_oid = match commit.parent() {
            Some(parent) if self.repository.database().contains(parent) => Some(parent.clone()),
            Some(parent) => {
                if !self.quiet {
                    eprintln!("Warning: Parent commit {} not found", parent);
                }
                None
            }
            None => None,
        };

        Some((commit_oid, commit))
    }
}
