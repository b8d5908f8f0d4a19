use crate::areas::repository::Repository;
use crate::artifacts::core::error::OrbError;
use crate::sync::client;
use std::io::Write;

impl Repository {
    pub fn remote_add(&mut self, name: &str, url: &str) -> anyhow::Result<()> {
        if !client::is_valid_url(url) {
            anyhow::bail!(OrbError::ValidationError(
                "invalid URL format - must begin with http:// or https://".to_string()
            ));
        }

        {
            let mut config = self.config_mut();
            config.add_remote(name, url)?;
            config.save()?;
        }

        writeln!(self.writer(), "Remote '{}' added with URL '{}'", name, url)?;

        Ok(())
    }

    pub fn remote_remove(&mut self, name: &str) -> anyhow::Result<()> {
        {
            let mut config = self.config_mut();
            config.remove_remote(name)?;
            config.save()?;
        }

        writeln!(self.writer(), "Remote '{}' removed", name)?;

        Ok(())
    }

    pub fn remote_list(&mut self) -> anyhow::Result<()> {
        let remotes = self.config().remotes();

        if remotes.is_empty() {
            writeln!(self.writer(), "No remotes configured")?;
            return Ok(());
        }

        writeln!(self.writer(), "Configured remotes:")?;
        for remote in remotes {
            writeln!(self.writer(), "{}\t{}", remote.name, remote.url)?;
        }

        Ok(())
    }
}
