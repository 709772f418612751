//! Repository layer for session records.
//!
//! Repositories hold data that CHANGES during gameplay. The runtime only talks
//! to the [`SessionRepository`] trait; [`InMemorySessionRepo`] is the default
//! backend.

mod error;
mod memory;
mod traits;

pub use error::{RepositoryError, Result};
pub use memory::InMemorySessionRepo;
pub use traits::SessionRepository;
