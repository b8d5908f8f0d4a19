//! Repository configuration
//!
//! Configuration lives in `.orb/config` as an INI-style text file:
//!
//! ```ini
//! [user]
//! 	name = Alice
//! [remote origin]
//! 	url = http://localhost:8000
//! ```
//!
//! In memory every value is addressed by a flattened dotted key, so
//! `[remote origin] url` becomes `remote.origin.url`. Saving groups keys
//! back into sections and writes them sorted, then renames a lock file
//! into place so the config is never observed half-written.

use derive_new::new;
use file_guard::Lock;
use std::collections::BTreeMap;
use std::path::Path;

/// Section prefix that holds remote definitions
const REMOTE_SECTION_PREFIX: &str = "remote";

/// A named remote and its URL
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct RemoteConfig {
    pub name: String,
    pub url: String,
}

/// Key-value configuration backed by `.orb/config`
#[derive(Debug)]
pub struct Config {
    path: Box<Path>,
    values: BTreeMap<String, String>,
}

impl Config {
    /// Load the configuration, treating a missing file as empty
    pub fn load(path: Box<Path>) -> anyhow::Result<Self> {
        let mut config = Config {
            path,
            values: BTreeMap::new(),
        };

        let content = match std::fs::read_to_string(config.path.as_ref()) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(config),
            Err(e) => return Err(e.into()),
        };

        let mut section = String::new();
        for line in content.lines() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse section headers: [section] or [remote <name>]
            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                section = match header.split_once(' ') {
                    Some((REMOTE_SECTION_PREFIX, name)) => {
                        format!("{}.{}", REMOTE_SECTION_PREFIX, name)
                    }
                    _ => header.to_string(),
                };
                continue;
            }

            // Parse key-value pairs, skipping anything else
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            let flat_key = if section.is_empty() {
                key.to_string()
            } else {
                format!("{}.{}", section, key)
            };
            config.values.insert(flat_key, value.to_string());
        }

        Ok(config)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// All configured remotes, sorted by name
    pub fn remotes(&self) -> Vec<RemoteConfig> {
        self.values
            .iter()
            .filter_map(|(key, value)| {
                let name = key
                    .strip_prefix("remote.")
                    .and_then(|rest| rest.strip_suffix(".url"))?;
                Some(RemoteConfig::new(name.to_string(), value.clone()))
            })
            .collect::<Vec<_>>()
    }

    pub fn remote(&self, name: &str) -> Option<RemoteConfig> {
        self.get(&format!("remote.{}.url", name))
            .map(|url| RemoteConfig::new(name.to_string(), url.to_string()))
    }

    pub fn add_remote(&mut self, name: &str, url: &str) -> anyhow::Result<()> {
        if self.remote(name).is_some() {
            anyhow::bail!("remote {} already exists", name);
        }

        self.set(format!("remote.{}.url", name), url);

        Ok(())
    }

    pub fn remove_remote(&mut self, name: &str) -> anyhow::Result<()> {
        if self.remote(name).is_none() {
            anyhow::bail!("remote '{}' not found", name);
        }

        let prefix = format!("remote.{}.", name);
        self.values.retain(|key, _| !key.starts_with(&prefix));

        Ok(())
    }

    /// Stored credentials for a remote, when both halves are present
    pub fn credentials(&self, remote_name: &str) -> Option<(String, String)> {
        let username = self.get(&format!("remote.{}.username", remote_name))?;
        let password = self.get(&format!("remote.{}.password", remote_name))?;

        Some((username.to_string(), password.to_string()))
    }

    /// Write the configuration back to disk atomically
    pub fn save(&self) -> anyhow::Result<()> {
        let mut config_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(self.path.as_ref())?;
        let _lock = file_guard::lock(&mut config_file, Lock::Exclusive, 0, 1)?;

        let lock_path = self.path.with_extension("lock");
        std::fs::write(&lock_path, self.render())?;
        std::fs::rename(&lock_path, self.path.as_ref())?;

        Ok(())
    }

    fn render(&self) -> String {
        // Group flattened keys back into sections. Remote keys regain their
        // `[remote <name>]` header, everything else splits on the first dot.
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        for (flat_key, value) in &self.values {
            let (section, key) = match flat_key.strip_prefix("remote.") {
                Some(rest) => match rest.split_once('.') {
                    Some((name, key)) => (
                        format!("{} {}", REMOTE_SECTION_PREFIX, name),
                        key.to_string(),
                    ),
                    None => (String::new(), flat_key.clone()),
                },
                None => match flat_key.split_once('.') {
                    Some((section, key)) => (section.to_string(), key.to_string()),
                    None => (String::new(), flat_key.clone()),
                },
            };

            sections
                .entry(section)
                .or_default()
                .insert(key, value.clone());
        }

        let mut content = String::new();
        for (section, values) in &sections {
            if !section.is_empty() {
                content.push_str(&format!("[{}]\n", section));
            }
            for (key, value) in values {
                content.push_str(&format!("\t{} = {}\n", key, value));
            }
            content.push('\n');
        }

        content
    }
}
