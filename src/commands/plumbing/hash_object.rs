use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use std::io::Write;

impl Repository {
    /// Compute the blob id for a file, storing the object when `write` is set
    pub fn hash_object(&mut self, file: &str, write: bool) -> anyhow::Result<()> {
        let blob = self.workspace().parse_blob(file.as_ref())?;
        let object_id = blob.object_id()?;

        writeln!(self.writer(), "{}", object_id)?;

        if write {
            self.database().store(blob)?;
        }

        Ok(())
    }
}
