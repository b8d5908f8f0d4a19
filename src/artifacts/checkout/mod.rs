//! Checkout operations and conflict handling
//!
//! This module handles switching between commits by:
//! - Computing differences between current and target states
//! - Detecting conflicts with local modifications
//! - Planning and executing file system changes
//! - Updating the index to match the target commit
//!
//! Conflicts are detected before any change touches the working
//! directory, so an aborted checkout leaves the tree as it was.

pub mod conflict;
pub mod migration;
pub mod tree_diff;
