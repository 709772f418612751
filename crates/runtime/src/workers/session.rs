//! Session worker that owns the authoritative [`SessionRecord`] of one player.
//!
//! Every read and mutation of a session is a [`Command`] processed one at a
//! time by this task, so tool use, camera updates and growth ticks against the
//! same farm never interleave. Mutations run against a working copy which is
//! written through to the repository before it replaces the live record; a
//! failed save or a rules rejection leaves the live record untouched.
//!
//! Player-driven commands refresh `last_active`. Growth ticks do not, so a
//! server-side ticker never keeps an abandoned session from going idle.

use std::sync::Arc;

use chrono::Utc;
use farm_core::{
    CameraDelta, FarmEngine, ScreenPoint, TilePosition, Tool, ToolUse, ToolUseResult,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::api::{Result, RuntimeError};
use crate::events::{EventBus, FarmEvent};
use crate::repository::SessionRepository;
use crate::types::{SessionId, SessionRecord, to_timestamp};

/// Commands that can be sent to a session worker.
pub enum Command {
    /// Read the current record (refreshes `last_active`).
    Query {
        reply: oneshot::Sender<Result<SessionRecord>>,
    },
    UseTool {
        request: ToolUse,
        reply: oneshot::Sender<Result<ToolUseReport>>,
    },
    /// Merge a camera delta and/or select a tool as one mutation.
    Patch {
        camera: Option<CameraDelta>,
        tool: Option<Tool>,
        reply: oneshot::Sender<Result<SessionRecord>>,
    },
    /// Run one growth tick. Does not count as player activity.
    AdvanceCrops {
        reply: oneshot::Sender<Result<SessionRecord>>,
    },
    Rest {
        reply: oneshot::Sender<Result<SessionRecord>>,
    },
    PickTile {
        screen: ScreenPoint,
        origin: ScreenPoint,
        reply: oneshot::Sender<Result<Option<TilePosition>>>,
    },
    /// Stop the worker after the commands already queued ahead of it.
    Shutdown,
}

/// Outcome of an applied tool use together with the committed session.
#[derive(Debug, Clone)]
pub struct ToolUseReport {
    pub result: ToolUseResult,
    pub snapshot: SessionRecord,
}

/// Sending side of one session worker's command channel.
#[derive(Clone)]
pub(crate) struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    /// Sends the command built by `make` and waits for the worker's reply.
    pub(crate) async fn request<T, F>(&self, make: F) -> Result<T>
    where
        F: FnOnce(oneshot::Sender<Result<T>>) -> Command,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(make(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Asks the worker to stop. A worker that already exited is fine.
    pub(crate) async fn shutdown(&self) {
        if self.command_tx.send(Command::Shutdown).await.is_err() {
            debug!("session worker already stopped");
        }
    }
}

/// Background task that serializes all access to one session.
pub struct SessionWorker {
    id: SessionId,
    record: SessionRecord,
    repository: Arc<dyn SessionRepository>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SessionWorker {
    pub fn new(
        record: SessionRecord,
        repository: Arc<dyn SessionRepository>,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            id: record.id(),
            record,
            repository,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Exits on [`Command::Shutdown`] or once every sender
    /// has been dropped.
    pub async fn run(mut self) {
        debug!(target: "runtime::worker", session = %self.id, "session worker started");

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                else => break,
            }
        }

        debug!(target: "runtime::worker", session = %self.id, "session worker stopped");
    }

    /// Returns `false` when the worker should stop.
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Query { reply } => {
                let result = self.commit(true, |_| Ok(()));
                if reply.send(result.map(|()| self.record.clone())).is_err() {
                    debug!("Query reply channel closed (caller dropped)");
                }
            }
            Command::UseTool { request, reply } => {
                let result = self.use_tool(request);
                if reply.send(result).is_err() {
                    debug!("UseTool reply channel closed (caller dropped)");
                }
            }
            Command::Patch {
                camera,
                tool,
                reply,
            } => {
                let result = self.commit(true, |record| {
                    let mut engine = FarmEngine::new(&mut record.game);
                    if let Some(delta) = camera {
                        engine.update_camera(delta);
                    }
                    if let Some(tool) = tool {
                        engine.select_tool(tool);
                    }
                    Ok(())
                });
                if reply.send(result.map(|()| self.record.clone())).is_err() {
                    debug!("Patch reply channel closed (caller dropped)");
                }
            }
            Command::AdvanceCrops { reply } => {
                let result = self.advance_crops();
                if reply.send(result.map(|()| self.record.clone())).is_err() {
                    debug!("AdvanceCrops reply channel closed (caller dropped)");
                }
            }
            Command::Rest { reply } => {
                let result = self.commit(true, |record| {
                    FarmEngine::new(&mut record.game).rest();
                    Ok(())
                });
                if reply.send(result.map(|()| self.record.clone())).is_err() {
                    debug!("Rest reply channel closed (caller dropped)");
                }
            }
            Command::PickTile {
                screen,
                origin,
                reply,
            } => {
                let result = self
                    .commit(true, |_| Ok(()))
                    .map(|()| self.record.game.pick_tile(screen, origin));
                if reply.send(result).is_err() {
                    debug!("PickTile reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn use_tool(&mut self, request: ToolUse) -> Result<ToolUseReport> {
        let id = self.id;
        let mut outcome = ToolUseResult::default();

        let committed = self.commit(true, |record| {
            let now = to_timestamp(Utc::now());
            outcome = FarmEngine::new(&mut record.game)
                .use_tool(request, now)
                .map_err(|error| RuntimeError::Tool {
                    error,
                    snapshot: Box::new(record.clone()),
                })?;
            Ok(())
        });

        match committed {
            Ok(()) => {
                self.event_bus.publish(FarmEvent::ToolUsed {
                    session: id,
                    tool: request.tool,
                    position: request.target,
                    applied: true,
                    energy_cost: outcome.energy_cost,
                });
                if outcome.harvest_value > 0 {
                    self.event_bus.publish(FarmEvent::CropHarvested {
                        session: id,
                        position: request.target,
                        harvest_value: outcome.harvest_value,
                    });
                }
                Ok(ToolUseReport {
                    result: outcome,
                    snapshot: self.record.clone(),
                })
            }
            Err(RuntimeError::Tool { error, .. }) => {
                debug!(
                    target: "runtime::worker",
                    session = %id,
                    tool = ?request.tool,
                    position = %request.target,
                    %error,
                    "tool use rejected"
                );
                self.event_bus.publish(FarmEvent::ToolUsed {
                    session: id,
                    tool: request.tool,
                    position: request.target,
                    applied: false,
                    energy_cost: request.tool.energy_cost(),
                });
                // The rejected working copy may carry a refreshed
                // `last_active`; report the committed record instead.
                Err(RuntimeError::Tool {
                    error,
                    snapshot: Box::new(self.record.clone()),
                })
            }
            Err(err) => Err(err),
        }
    }

    fn advance_crops(&mut self) -> Result<()> {
        let mut stages_gained = 0;
        self.commit(false, |record| {
            stages_gained = FarmEngine::new(&mut record.game).advance_crops();
            Ok(())
        })?;

        self.event_bus.publish(FarmEvent::CropsAdvanced {
            session: self.id,
            stages_gained,
        });
        Ok(())
    }

    /// Applies `mutate` to a copy of the live record, saves the copy and only
    /// then swaps it in. `touch` refreshes `last_active` on the copy.
    fn commit<F>(&mut self, touch: bool, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut SessionRecord) -> Result<()>,
    {
        let mut working = self.record.clone();
        mutate(&mut working)?;
        if touch {
            working.player.last_active = Utc::now();
        }

        if let Err(err) = self.repository.save(&working) {
            warn!(
                target: "runtime::worker",
                session = %self.id,
                error = %err,
                "failed to persist session; change discarded"
            );
            return Err(err.into());
        }

        self.record = working;
        Ok(())
    }
}
