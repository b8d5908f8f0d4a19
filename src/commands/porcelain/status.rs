use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{ChangeSet, Status};
use std::io::Write;

impl Repository {
    pub async fn status(&mut self) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        let status_info = Status::new(self).initialize(&mut index).await?;

        self.report_branch_position()?;

        let staged = &status_info.index_changeset;
        let unstaged = &status_info.workspace_changeset;
        let untracked = &status_info.untracked_changeset;

        if !staged.is_empty() {
            writeln!(self.writer(), "\nChanges to be committed:")?;
            writeln!(
                self.writer(),
                "  (use \"orb reset HEAD <file>...\" to unstage)"
            )?;
            self.report_changeset(staged)?;
        }

        if !unstaged.is_empty() {
            writeln!(self.writer(), "\nChanges not staged for commit:")?;
            writeln!(
                self.writer(),
                "  (use \"orb add <file>...\" to update what will be committed)"
            )?;
            writeln!(
                self.writer(),
                "  (use \"orb checkout -- <file>...\" to discard changes in working directory)"
            )?;
            self.report_changeset(unstaged)?;
        }

        if !untracked.is_empty() {
            writeln!(self.writer(), "\nUntracked files:")?;
            writeln!(
                self.writer(),
                "  (use \"orb add <file>...\" to include in what will be committed)"
            )?;
            self.report_changeset(untracked)?;
        }

        if staged.is_empty() && unstaged.is_empty() {
            if untracked.is_empty() {
                writeln!(self.writer(), "nothing to commit, working tree clean")?;
            } else {
                writeln!(
                    self.writer(),
                    "\nnothing added to commit but untracked files present (use \"orb add\" to track)"
                )?;
            }
        }

        Ok(())
    }

    /// Print the `On branch` header, or the detached position when HEAD
    /// points at a commit directly
    fn report_branch_position(&self) -> anyhow::Result<()> {
        let current_ref = self.refs().current_ref(None)?;

        if current_ref.is_detached_head() {
            let head = self
                .refs()
                .read_head()?
                .ok_or_else(|| anyhow::anyhow!("HEAD is detached but empty"))?;
            writeln!(self.writer(), "HEAD detached at {}", head.to_short_oid())?;
        } else {
            writeln!(self.writer(), "On branch {}", current_ref.to_short_name())?;
        }

        Ok(())
    }

    fn report_changeset(&self, changeset: &ChangeSet) -> anyhow::Result<()> {
        for (path, change_type) in changeset {
            writeln!(self.writer(), "{}{}", change_type, path.display())?;
        }

        Ok(())
    }
}
