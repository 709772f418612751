//! Worker tasks that back the runtime orchestration.
//!
//! Each live session is owned by a [`SessionWorker`]. The sweeper and the
//! growth ticker are optional periodic tasks that act on all sessions through
//! the registry.

mod growth;
mod session;
mod sweeper;

pub use growth::GrowthTicker;
pub use session::{Command, SessionWorker, ToolUseReport};
pub(crate) use session::SessionHandle;
pub use sweeper::IdleSweeper;
