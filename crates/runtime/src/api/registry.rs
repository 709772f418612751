//! Registry of live session workers.
//!
//! The [`SessionRegistry`] maps session ids to running [`SessionWorker`]
//! tasks. The repository stays the source of truth: a session that has a
//! record but no live worker (after an eviction race or a restart over a
//! durable backend) is re-hydrated on first access.
//!
//! # Locking
//!
//! Lookups take the read lock. Spawning, deleting and evicting take the write
//! lock and hold it until the worker has stopped and the repository reflects
//! the outcome, so a lookup never resurrects a session that is being removed.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use farm_core::{Avatar, GameConfig, GameSession};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Result, RuntimeError};
use crate::events::{EventBus, SessionEvent};
use crate::repository::SessionRepository;
use crate::types::{PlayerProfile, SessionId, SessionRecord};
use crate::workers::{Command, SessionHandle, SessionWorker};

struct LiveSession {
    handle: SessionHandle,
    task: JoinHandle<()>,
}

pub(crate) struct SessionRegistry {
    live: RwLock<HashMap<SessionId, LiveSession>>,
    repository: Arc<dyn SessionRepository>,
    event_bus: EventBus,
    game_config: GameConfig,
    command_buffer_size: usize,
}

impl SessionRegistry {
    pub(crate) fn new(
        repository: Arc<dyn SessionRepository>,
        event_bus: EventBus,
        game_config: GameConfig,
        command_buffer_size: usize,
    ) -> Self {
        Self {
            live: RwLock::new(HashMap::new()),
            repository,
            event_bus,
            game_config,
            command_buffer_size: command_buffer_size.max(1),
        }
    }

    /// Creates a fresh farm for `avatar`, stores it and starts its worker.
    pub(crate) async fn create(&self, avatar: Avatar) -> Result<SessionRecord> {
        let id = SessionId::new();
        let record = SessionRecord {
            player: PlayerProfile::new(id, avatar, Utc::now()),
            game: GameSession::new(&self.game_config),
        };
        self.repository.save(&record)?;

        let mut live = self.live.write().await;
        live.insert(id, self.spawn(record.clone()));
        drop(live);

        info!(session = %id, name = %record.player.avatar.name, "session created");
        self.event_bus.publish(SessionEvent::Created { session: id });
        Ok(record)
    }

    /// Returns the handle of a live worker, re-hydrating from the repository
    /// when needed.
    pub(crate) async fn get(&self, id: SessionId) -> Result<SessionHandle> {
        if let Some(session) = self.live.read().await.get(&id) {
            return Ok(session.handle.clone());
        }

        let mut live = self.live.write().await;
        // Another caller may have spawned it while we waited for the lock.
        if let Some(session) = live.get(&id) {
            return Ok(session.handle.clone());
        }

        let record = self
            .repository
            .load(id)?
            .ok_or(RuntimeError::SessionNotFound(id))?;
        debug!(session = %id, "re-hydrating session worker from repository");

        let session = self.spawn(record);
        let handle = session.handle.clone();
        live.insert(id, session);
        Ok(handle)
    }

    pub(crate) async fn contains(&self, id: SessionId) -> bool {
        self.live.read().await.contains_key(&id) || self.repository.exists(id)
    }

    /// Stops the worker and deletes the record.
    pub(crate) async fn delete(&self, id: SessionId) -> Result<()> {
        let mut live = self.live.write().await;
        let stopped = live.remove(&id);
        let was_live = stopped.is_some();
        if let Some(session) = stopped {
            Self::stop(session).await?;
        }

        if !was_live && !self.repository.exists(id) {
            return Err(RuntimeError::SessionNotFound(id));
        }
        self.repository.delete(id)?;
        drop(live);

        info!(session = %id, "session deleted");
        self.event_bus.publish(SessionEvent::Deleted { session: id });
        Ok(())
    }

    /// Removes every session whose `last_active` is older than `cutoff`.
    /// Returns how many were evicted.
    pub(crate) async fn evict_idle_since(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut evicted = 0;

        for id in self.repository.list_ids()? {
            let Some(record) = self.repository.load(id)? else {
                continue;
            };
            if record.player.last_active >= cutoff {
                continue;
            }

            let mut live = self.live.write().await;
            if let Some(session) = live.remove(&id) {
                Self::stop(session).await?;
            }

            // Commands queued ahead of the shutdown may have touched it.
            let Some(latest) = self.repository.load(id)? else {
                continue;
            };
            if latest.player.last_active >= cutoff {
                continue;
            }
            self.repository.delete(id)?;
            drop(live);

            evicted += 1;
            info!(
                session = %id,
                last_active = %latest.player.last_active,
                "evicted idle session"
            );
            self.event_bus.publish(SessionEvent::Evicted {
                session: id,
                last_active: latest.player.last_active,
            });
        }

        Ok(evicted)
    }

    /// Handles of every live worker.
    pub(crate) async fn live_handles(&self) -> Vec<(SessionId, SessionHandle)> {
        self.live
            .read()
            .await
            .iter()
            .map(|(id, session)| (*id, session.handle.clone()))
            .collect()
    }

    /// Number of sessions with a running worker.
    pub(crate) async fn live_count(&self) -> usize {
        self.live.read().await.len()
    }

    /// Stops every worker. Records stay in the repository.
    pub(crate) async fn shutdown_all(&self) -> Result<()> {
        let drained: Vec<LiveSession> = {
            let mut live = self.live.write().await;
            live.drain().map(|(_, session)| session).collect()
        };

        for session in drained {
            Self::stop(session).await?;
        }
        Ok(())
    }

    fn spawn(&self, record: SessionRecord) -> LiveSession {
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.command_buffer_size);
        let worker = SessionWorker::new(
            record,
            Arc::clone(&self.repository),
            command_rx,
            self.event_bus.clone(),
        );

        let task = tokio::spawn(async move {
            worker.run().await;
        });

        LiveSession {
            handle: SessionHandle::new(command_tx),
            task,
        }
    }

    async fn stop(session: LiveSession) -> Result<()> {
        session.handle.shutdown().await;
        session.task.await.map_err(|err| {
            warn!(error = %err, "session worker did not stop cleanly");
            RuntimeError::WorkerJoin(err)
        })
    }
}
