use crate::areas::repository::Repository;
use crate::artifacts::core::error::OrbError;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::tree::Tree;
use std::io::Write;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let message = message.trim();
        if message.is_empty() {
            anyhow::bail!(OrbError::ValidationError(
                "aborting commit due to empty commit message".to_string()
            ));
        }

        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;
        index.refresh_metadata(self.workspace());

        if index.entries().count() == 0 {
            anyhow::bail!(OrbError::ValidationError(
                "nothing to commit (use \"orb add\" to stage files)".to_string()
            ));
        }

        let tree = Tree::build(index.entries())?;
        let tree_id = tree.object_id()?;
        let store_tree = &|tree: &Tree| self.database().store(tree.clone());
        tree.traverse(store_tree)?;

        let parent = self.refs().read_head()?;
        let is_root = match parent {
            Some(_) => "",
            None => "(root-commit) ",
        };

        let author = {
            let config = self.config();
            Author::load(
                config.get("user.name").map(str::to_string),
                config.get("user.email").map(str::to_string),
            )
        };

        let commit = Commit::new(parent, tree_id, author, message.to_string());
        let commit_id = commit.object_id()?;
        self.database().store(commit.clone())?;
        self.refs().update_head(commit_id.clone())?;

        writeln!(
            self.writer(),
            "[{}{}] {}",
            is_root,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(())
    }
}
