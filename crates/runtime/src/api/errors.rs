//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from session workers, repositories, and the farm rules so
//! clients can bubble them up with consistent context.
use farm_core::{ErrorSeverity, GameError, ToolError, ValidationError};
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;
use crate::types::{SessionId, SessionRecord};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The farm rules rejected a tool use. `snapshot` is the unchanged
    /// session so callers can resync without a second round-trip.
    #[error("{error}")]
    Tool {
        #[source]
        error: ToolError,
        snapshot: Box<SessionRecord>,
    },

    #[error("session worker command channel closed")]
    CommandChannelClosed,

    #[error("session worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RuntimeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RuntimeError::SessionNotFound(_) => ErrorSeverity::Validation,
            RuntimeError::Validation(err) => err.severity(),
            RuntimeError::Tool { error, .. } => error.severity(),
            RuntimeError::CommandChannelClosed
            | RuntimeError::ReplyChannelClosed(_)
            | RuntimeError::WorkerJoin(_)
            | RuntimeError::Repository(_) => ErrorSeverity::Internal,
        }
    }

    /// The rejected tool error, if this is a rules rejection.
    pub fn tool_error(&self) -> Option<&ToolError> {
        match self {
            RuntimeError::Tool { error, .. } => Some(error),
            _ => None,
        }
    }
}
