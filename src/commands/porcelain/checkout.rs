use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::SymRefName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::object_id::ObjectId;

const DETACHMENT_NOTICE: &str = r#"
You are in 'detached HEAD' state. You can look around, make experimental
changes and commit them, and you can discard any commits you make in this
state without impacting any branches by performing another checkout.

If you want to create a new branch to retain commits you create, you may
do so (now or later) by using the branch command. Example:

    orb branch <new-branch-name>
"#;

impl Repository {
    /// Switch the working tree, index and HEAD to `target`
    ///
    /// A branch name attaches HEAD to it; a commit id (or unique prefix)
    /// detaches HEAD. The migration refuses to clobber local changes, in
    /// which case nothing has been touched when the error surfaces.
    pub async fn checkout(&mut self, target: &str, create_branch: bool) -> anyhow::Result<()> {
        if create_branch {
            self.branch(Some(target), None)?;
        }

        let current_ref = self.refs().current_ref(None)?;
        let current_oid = self
            .refs()
            .read_oid(&current_ref)?
            .ok_or_else(|| anyhow::anyhow!("no current HEAD to checkout from"))?;

        let target_oid = Revision::try_parse(target)?
            .resolve(self)?
            .ok_or_else(|| anyhow::anyhow!("'{}' is not a branch or commit hash", target))?;

        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        let tree_diff = self
            .database()
            .tree_diff(Some(&current_oid), Some(&target_oid))?;

        let mut migration = Migration::new(self, &mut index, tree_diff);
        migration.apply_changes()?;

        index.write_updates()?;
        self.refs()
            .set_head(target, target_oid.clone().as_ref().into())?;
        let new_ref = self.refs().current_ref(None)?;

        self.report_checkout(target, &current_ref, &new_ref, &current_oid, &target_oid)
    }

    /// Status lines go to stderr, matching the usual porcelain behavior
    fn report_checkout(
        &self,
        target: &str,
        current_ref: &SymRefName,
        new_ref: &SymRefName,
        current_oid: &ObjectId,
        target_oid: &ObjectId,
    ) -> anyhow::Result<()> {
        if current_ref.is_detached_head() && current_oid != target_oid {
            self.print_head_position("Previous HEAD position was", current_oid)?;
        }

        if new_ref.is_detached_head() {
            if !current_ref.is_detached_head() {
                eprintln!("Note: checking out '{}'.\n{}", target, DETACHMENT_NOTICE);
            }
            self.print_head_position("HEAD is now at", target_oid)?;
        } else if new_ref == current_ref {
            eprintln!("Already on '{}'", target);
        } else {
            eprintln!("Switched to branch '{}'", target);
        }

        Ok(())
    }

    fn print_head_position(&self, message: &str, oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self
            .database()
            .parse_object_as_commit(oid)?
            .ok_or_else(|| anyhow::anyhow!("object is not a commit"))?;

        eprintln!("{} {} {}", message, oid.to_short_oid(), commit.short_message());
        Ok(())
    }
}
