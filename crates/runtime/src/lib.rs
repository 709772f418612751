//! Session hosting for the farm game.
//!
//! This crate wires together the session store, per-session workers and the
//! event bus into a cohesive runtime API. Consumers embed [`Runtime`] and
//! interact with player sessions through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`repository`] is the storage seam for session records
//! - [`types`] holds session identity and the stored record
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod repository;
pub mod runtime;
pub mod types;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle, ToolUseReport};
pub use events::{Event, EventBus, FarmEvent, SessionEvent, Topic};
pub use repository::{InMemorySessionRepo, RepositoryError, SessionRepository};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use types::{PlayerProfile, SessionId, SessionRecord};
