//! Command implementations
//!
//! Commands are split into two layers:
//!
//! - `plumbing`: low-level object database access (cat-file, hash-object,
//!   ls-tree)
//! - `porcelain`: the user-facing workflow commands (init, add, commit,
//!   status, log, branch, checkout, config, remote and the sync commands)
//!
//! Every command except `clone` is a method on
//! [`Repository`](crate::areas::repository::Repository) and writes its
//! output through the repository writer. `clone` is a free function since
//! no repository exists before it runs.

pub mod plumbing;
pub mod porcelain;
