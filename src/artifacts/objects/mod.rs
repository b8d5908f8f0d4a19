//! Object types and operations
//!
//! Orb stores all content as objects identified by SHA-1 hashes. There are
//! three object kinds:
//!
//! - **Blob**: File content (raw bytes)
//! - **Tree**: Directory listing (names, modes, and object IDs)
//! - **Commit**: Snapshot with metadata (author, message, parent commit, tree)
//!
//! All objects serialize to the canonical frame `<kind> <size>\0<payload>`,
//! which is also the byte sequence the SHA-1 identity is computed over and the
//! unit of transfer on the sync wire.

pub mod blob;
pub mod closure;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Shortest object ID prefix accepted by revision lookup
pub const MIN_PREFIX_LENGTH: usize = 4;
