//! Porcelain commands (user-facing operations)
//!
//! Porcelain commands provide the high-level interface for everyday
//! version control work, composing the areas and artifacts into complete
//! workflows.
//!
//! ## Commands
//!
//! - `init`: initialize a new repository
//! - `add`: stage files for commit
//! - `commit`: record the staged snapshot
//! - `status`: show working tree status
//! - `log`: show commit history
//! - `branch`: create or list branches
//! - `checkout`: switch branches or detach at a commit
//! - `config`: read and write configuration values
//! - `remote`: manage remote endpoints
//! - `clone`, `push`, `pull`, `serve`: synchronize with a remote server

pub mod add;
pub mod branch;
pub mod checkout;
pub mod clone;
pub mod commit;
pub mod config;
pub mod init;
pub mod log;
pub mod pull;
pub mod push;
pub mod remote;
pub mod serve;
pub mod status;
