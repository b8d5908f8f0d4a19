use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::SymRefName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Walk the history starting at `start` (HEAD when absent) and print
    /// each commit in medium format
    pub fn log(&self, start: Option<&str>, quiet: bool) -> anyhow::Result<()> {
        self.set_reverse_refs(self.refs().reverse_refs()?);
        self.set_current_ref(self.refs().current_ref(None)?);

        let revision = Revision::try_parse(start.unwrap_or("HEAD"))?;

        for (commit_oid, commit) in RevList::new(self, revision, quiet).into_iter()? {
            self.show_commit_medium(&commit_oid, &commit)?;
            writeln!(self.writer())?;
        }

        Ok(())
    }

    fn show_commit_medium(&self, commit_oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "commit {}{}",
            commit_oid,
            self.commit_decoration(commit_oid)
        )?;
        writeln!(self.writer(), "Author: {}", commit.author().display_name())?;
        writeln!(
            self.writer(),
            "Date:   {}",
            commit.author().readable_timestamp()
        )?;
        writeln!(self.writer())?;
        for message_line in commit.message().lines() {
            writeln!(self.writer(), "    {}", message_line)?;
        }

        Ok(())
    }

    fn commit_decoration(&self, commit_oid: &ObjectId) -> String {
        let reverse_refs = self.reverse_refs();
        let Some(ref_names) = reverse_refs.get(commit_oid) else {
            return String::new();
        };

        // HEAD folds into the current branch's decoration while attached
        // and stands alone while detached
        let (head, mut refs): (Vec<_>, Vec<_>) = ref_names.iter().partition(|ref_name| {
            ref_name.is_detached_head() && !self.current_ref().is_detached_head()
        });
        refs.sort_by_key(|ref_name| {
            (
                **ref_name != *self.current_ref(),
                ref_name.as_ref_path().to_string(),
            )
        });

        let names = refs
            .into_iter()
            .map(|ref_name| self.ref_decoration_name(head.first().copied(), ref_name))
            .collect::<Vec<_>>()
            .join(", ");

        if names.is_empty() {
            String::new()
        } else {
            format!(" ({})", names)
        }
    }

    fn ref_decoration_name(&self, head: Option<&SymRefName>, ref_name: &SymRefName) -> String {
        let name = if ref_name.is_detached_head() {
            ref_name.as_ref_path().cyan().to_string()
        } else {
            ref_name.to_short_name().green().to_string()
        };

        if let Some(head) = head
            && *ref_name == *self.current_ref()
        {
            return format!("{} -> {}", head.as_ref_path().cyan(), name);
        }

        name
    }
}
