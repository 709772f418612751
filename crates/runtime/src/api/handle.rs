//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides the registry and channel plumbing and offers async
//! helpers for every session operation, plus event subscriptions.
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use farm_core::{Avatar, CameraDelta, ScreenPoint, TilePosition, Tool, ToolUse};
use tokio::sync::{broadcast, oneshot};

use super::errors::{Result, RuntimeError};
use super::registry::SessionRegistry;
use crate::events::{Event, EventBus, Topic};
use crate::types::{SessionId, SessionRecord};
use crate::workers::{Command, ToolUseReport};

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    registry: Arc<SessionRegistry>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(registry: Arc<SessionRegistry>, event_bus: EventBus) -> Self {
        Self {
            registry,
            event_bus,
        }
    }

    /// Create a session for an already-validated avatar and return its
    /// initial state.
    pub async fn create_session(&self, avatar: Avatar) -> Result<SessionRecord> {
        self.registry.create(avatar).await
    }

    /// Current state of a session.
    pub async fn get_session(&self, id: SessionId) -> Result<SessionRecord> {
        self.call(id, |reply| Command::Query { reply }).await
    }

    /// Attempt a tool use. A rules rejection comes back as
    /// [`RuntimeError::Tool`] carrying the unchanged session.
    pub async fn use_tool(&self, id: SessionId, request: ToolUse) -> Result<ToolUseReport> {
        self.call(id, |reply| Command::UseTool { request, reply }).await
    }

    /// Merge a partial camera offset and return the updated session.
    pub async fn update_camera(&self, id: SessionId, delta: CameraDelta) -> Result<SessionRecord> {
        self.patch_session(id, Some(delta), None).await
    }

    /// Change the held tool without using it.
    pub async fn select_tool(&self, id: SessionId, tool: Tool) -> Result<SessionRecord> {
        self.patch_session(id, None, Some(tool)).await
    }

    /// Apply a camera delta and a tool selection in a single step. Either part
    /// may be absent; with both absent this behaves like
    /// [`get_session`](Self::get_session).
    pub async fn patch_session(
        &self,
        id: SessionId,
        camera: Option<CameraDelta>,
        tool: Option<Tool>,
    ) -> Result<SessionRecord> {
        self.call(id, |reply| Command::Patch {
            camera,
            tool,
            reply,
        })
        .await
    }

    /// Whether a session with this id exists, live or stored. Does not start
    /// a worker or count as activity.
    pub async fn session_exists(&self, id: SessionId) -> bool {
        self.registry.contains(id).await
    }

    /// Run one growth tick on the session's farm. Ticks do not refresh the
    /// session's `last_active`.
    pub async fn advance_crops(&self, id: SessionId) -> Result<SessionRecord> {
        self.call(id, |reply| Command::AdvanceCrops { reply }).await
    }

    /// End the day and refill energy.
    pub async fn rest(&self, id: SessionId) -> Result<SessionRecord> {
        self.call(id, |reply| Command::Rest { reply }).await
    }

    /// Resolve a screen point to a tile using the session's camera.
    pub async fn pick_tile(
        &self,
        id: SessionId,
        screen: ScreenPoint,
        origin: ScreenPoint,
    ) -> Result<Option<TilePosition>> {
        self.call(id, |reply| Command::PickTile {
            screen,
            origin,
            reply,
        })
        .await
    }

    /// Stop the session's worker and delete its record.
    pub async fn delete_session(&self, id: SessionId) -> Result<()> {
        self.registry.delete(id).await
    }

    /// Evict every session idle since before `cutoff`. Returns the count.
    pub async fn evict_idle_since(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        self.registry.evict_idle_since(cutoff).await
    }

    /// Run one growth tick on every live session. Sessions that fail are
    /// skipped; returns how many advanced.
    pub async fn advance_all_crops(&self) -> usize {
        let mut advanced = 0;
        for (id, session) in self.registry.live_handles().await {
            match session.request(|reply| Command::AdvanceCrops { reply }).await {
                Ok(_) => advanced += 1,
                Err(err) => {
                    tracing::debug!(session = %id, error = %err, "skipped growth tick");
                }
            }
        }
        advanced
    }

    /// Number of sessions with a running worker.
    pub async fn live_sessions(&self) -> usize {
        self.registry.live_count().await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Session` - Session created, deleted and evicted
    /// - `Topic::Farm` - Tool use, harvests and growth ticks
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Sends a command to the session's worker. A worker that stopped between
    /// lookup and send (deleted or evicted) is looked up once more, which
    /// either re-hydrates it or reports the session as gone.
    async fn call<T, F>(&self, id: SessionId, make: F) -> Result<T>
    where
        F: Fn(oneshot::Sender<Result<T>>) -> Command,
    {
        let session = self.registry.get(id).await?;
        match session.request(&make).await {
            Err(RuntimeError::CommandChannelClosed | RuntimeError::ReplyChannelClosed(_)) => {
                self.registry.get(id).await?.request(&make).await
            }
            other => other,
        }
    }
}
