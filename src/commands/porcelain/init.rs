use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH_NAME;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        self.initialize_storage().await?;

        writeln!(
            self.writer(),
            "Initialized empty orb repository in {}",
            self.path().display()
        )?;

        Ok(())
    }

    /// Lay down the `.orb` directory skeleton without announcing it
    ///
    /// Shared between `init` and `clone`, which reports its own progress.
    pub(crate) async fn initialize_storage(&self) -> anyhow::Result<()> {
        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .orb/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .orb/refs/heads directory")?;

        fs::create_dir_all(self.refs().tags_path())
            .context("Failed to create .orb/refs/tags directory")?;

        self.refs()
            .set_head(
                DEFAULT_BRANCH_NAME,
                format!("ref: refs/heads/{}", DEFAULT_BRANCH_NAME),
            )
            .context("Failed to create initial HEAD reference")?;

        let index = self.index();
        let index = index.lock().await;
        if !index.path().exists() {
            fs::write(index.path(), b"").context("Failed to create .orb/index file")?;
        }

        {
            let mut config = self.config_mut();
            if config.get("core.repositoryformatversion").is_none() {
                config.set("core.repositoryformatversion", "0");
                config.set("core.filemode", "true");
                config.save()?;
            }
        }

        Ok(())
    }
}
