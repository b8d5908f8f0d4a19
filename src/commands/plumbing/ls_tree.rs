use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// List one level of the tree that `target` resolves to
    ///
    /// `target` may name a tree directly or anything that peels to a
    /// commit, in which case the commit's root tree is listed.
    pub fn ls_tree(&mut self, target: &str) -> anyhow::Result<()> {
        let oid = self.resolve_object(target)?;

        let tree_oid = match self.database().parse_object_as_commit(&oid)? {
            Some(commit) => commit.tree_oid().clone(),
            None => oid,
        };

        let tree = self
            .database()
            .parse_object_as_tree(&tree_oid)?
            .ok_or_else(|| anyhow::anyhow!("{} is not a tree object", tree_oid))?;

        for (name, entry) in tree.into_entries() {
            let object_type = if entry.is_tree() { "tree" } else { "blob" };

            writeln!(
                self.writer(),
                "{} {} {}\t{}",
                entry.mode.as_str(),
                object_type,
                entry.oid,
                name
            )?;
        }

        Ok(())
    }
}
