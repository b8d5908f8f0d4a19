use crate::areas::repository::Repository;
use crate::artifacts::core::error::OrbError;
use crate::artifacts::index::index_entry::IndexEntry;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use std::io::Write;
use std::path::Path;

impl Repository {
    pub async fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        if paths.is_empty() {
            anyhow::bail!(OrbError::ValidationError(
                "nothing specified, nothing added".to_string()
            ));
        }

        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        // Expand each argument into the files beneath it, skipping paths
        // that cannot be resolved the way a missing file would be.
        let mut expanded = Vec::new();
        for path in paths {
            match Path::new(path).canonicalize() {
                Ok(absolute_path) => {
                    expanded.extend(self.workspace().list_files(Some(absolute_path))?);
                }
                Err(error) => {
                    eprintln!("Warning: cannot stat '{}': {}", path, error);
                }
            }
        }

        for path in expanded {
            let data = self.workspace().read_file(&path)?;
            let stat = self.workspace().stat_file(&path)?;

            let blob = Blob::new(data, stat.clone().mode.try_into()?);
            let blob_id = blob.object_id()?;

            self.database().store(blob)?;
            index.add(IndexEntry::new(path.clone(), blob_id, stat))?;

            writeln!(self.writer(), "Added '{}'", path.display())?;
        }

        index.write_updates()?;

        Ok(())
    }
}
