use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    pub fn config_get(&mut self, key: &str) -> anyhow::Result<()> {
        let value = self
            .config()
            .get(key)
            .ok_or_else(|| anyhow::anyhow!("no value set for {}", key))?
            .to_string();

        writeln!(self.writer(), "{}", value)?;

        Ok(())
    }

    pub fn config_set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut config = self.config_mut();
        config.set(key, value);
        config.save()?;

        Ok(())
    }
}
