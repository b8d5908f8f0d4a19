//! Commit history traversal for orb log
//!
//! - `rev_list`: Linear history walk from a starting revision
//!
//! Histories are single-parent chains, so the walk follows parent links
//! until the root commit or the first unfetched parent.

pub mod rev_list;
