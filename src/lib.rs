//! orb, a content-addressed version control system
//!
//! A repository lives in a `.orb` directory next to the files it tracks:
//! an object database of zlib-deflated blobs, trees and commits addressed
//! by SHA-1, an index that stages the next commit, and refs that name
//! commits. Repositories synchronize over a small HTTP protocol served by
//! `orb serve`.
//!
//! The crate is organized in four layers:
//!
//! - [`areas`]: the on-disk storage areas (workspace, index, database,
//!   refs, config) and the [`areas::repository::Repository`] facade
//! - [`artifacts`]: the value types and algorithms those areas exchange
//! - [`commands`]: the CLI commands, implemented on `Repository`
//! - [`sync`]: the HTTP client and server used by clone, push and pull

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod sync;
