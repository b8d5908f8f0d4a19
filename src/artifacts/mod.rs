//! Data structures and algorithms
//!
//! This module contains the core types and algorithms:
//!
//! - `branch`: Branch names and revision parsing
//! - `checkout`: Checkout planning, tree diffing and conflict detection
//! - `core`: Shared utilities (error kinds, pager wrapper)
//! - `database`: Database entry types
//! - `index`: Index/staging area data structures
//! - `log`: Commit history traversal
//! - `objects`: Object types (blob, tree, commit) and reachability
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod database;
pub mod index;
pub mod log;
pub mod objects;
pub mod status;
