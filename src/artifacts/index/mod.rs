//! Index file format
//!
//! The index (also called staging area) stores information about the working
//! tree. It tracks which files should be included in the next commit.
//!
//! ## File Format
//!
//! ```text
//! <object-id> <path>\n
//! <object-id> <path>\n
//! ...
//! ```
//!
//! One line per staged file, sorted by path. Paths are relative to the
//! repository root with `/` separators. The file is rewritten atomically
//! through `.orb/index.lock`.

pub mod entry_mode;
pub mod index_entry;
