//! Domain error kinds
//!
//! Errors that callers need to tell apart are raised as [`OrbError`] values
//! embedded in `anyhow` chains. Commands and the sync server match on them
//! with `downcast_ref`, which sees through any `context` layers added along
//! the way. Everything else stays an anonymous `anyhow` error.

use thiserror::Error;

/// Error kinds with meaning beyond their message
#[derive(Debug, Error)]
pub enum OrbError {
    /// An object ID that does not exist in the database
    #[error("object {0} not found")]
    NotFound(String),

    /// An object file whose content cannot be decoded
    #[error("corrupt object: {0}")]
    CorruptObject(String),

    /// A commit object missing required header lines
    #[error("malformed commit object: {0}")]
    MalformedCommit(String),

    /// User input rejected before touching the repository
    #[error("{0}")]
    ValidationError(String),

    /// Credentials missing or rejected by the server
    #[error("authentication failed: {0}")]
    AuthError(String),

    /// A malformed or truncated sync exchange
    #[error("protocol error: {0}")]
    ProtocolError(String),

    /// A push that would lose commits on the remote
    #[error("{0}")]
    NotFastForward(String),
}
