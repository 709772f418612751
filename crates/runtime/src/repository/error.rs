//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("session repository lock was poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
