use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// List branches, or create one at HEAD (or at `source`)
    pub fn branch(&mut self, branch_name: Option<&str>, source: Option<&str>) -> anyhow::Result<()> {
        match branch_name {
            Some(branch_name) => self.create_branch(branch_name, source),
            None => self.list_branches(),
        }
    }

    fn create_branch(&mut self, branch_name: &str, source: Option<&str>) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;

        let source_oid = if let Some(source) = source {
            Revision::try_parse(source)?.resolve(self)?
        } else {
            self.refs().read_head()?
        }
        .ok_or_else(|| anyhow::anyhow!("no current HEAD to branch from"))?;

        self.refs().create_branch(branch_name.clone(), source_oid)?;

        writeln!(self.writer(), "Created branch '{}'", branch_name)?;

        Ok(())
    }

    fn list_branches(&mut self) -> anyhow::Result<()> {
        let current_ref = self.refs().current_ref(None)?;
        let mut branches = self.refs().list_branches()?;
        branches.sort();

        for branch in branches {
            if branch == current_ref {
                writeln!(self.writer(), "* {}", branch.to_short_name().green())?;
            } else {
                writeln!(self.writer(), "  {}", branch.to_short_name())?;
            }
        }

        Ok(())
    }

    /// The branch HEAD is attached to
    pub(crate) fn current_branch(&self) -> anyhow::Result<BranchName> {
        let current_ref = self.refs().current_ref(None)?;

        if current_ref.is_detached_head() {
            anyhow::bail!("HEAD is detached, specify a branch name");
        }

        BranchName::try_parse_sym_ref_name(&current_ref)
    }
}
