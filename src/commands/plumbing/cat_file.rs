use crate::areas::repository::Repository;
use std::io::Write;

impl Repository {
    /// Pretty-print the object that `target` resolves to
    ///
    /// `target` may be a full or abbreviated object id, a branch name or a
    /// revision expression such as `HEAD^`.
    pub fn cat_file(&mut self, target: &str) -> anyhow::Result<()> {
        let oid = self.resolve_object(target)?;
        let object = self.database().parse_object(&oid)?;
        write!(self.writer(), "{}", object.display())?;

        Ok(())
    }
}
