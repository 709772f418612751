//! High-level runtime orchestrator.
//!
//! The runtime owns the session registry and the periodic workers, and
//! exposes a builder-based API. Clients interact with sessions through the
//! cloneable [`RuntimeHandle`].

use std::sync::Arc;
use std::time::Duration;

use farm_core::GameConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::registry::SessionRegistry;
use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::repository::{InMemorySessionRepo, SessionRepository};
use crate::workers::{GrowthTicker, IdleSweeper};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub game_config: GameConfig,
    pub event_buffer_size: usize,
    /// Per-session command queue depth.
    pub command_buffer_size: usize,
    /// Sessions untouched for longer than this are evicted. `None` keeps
    /// them until deleted.
    pub session_idle_ttl: Option<Duration>,
    pub sweep_interval: Duration,
    /// Server-side growth cadence. `None` leaves growth to client requests.
    pub growth_tick_interval: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            game_config: GameConfig::default(),
            event_buffer_size: 100,
            command_buffer_size: 32,
            session_idle_ttl: Some(Duration::from_secs(60 * 60)),
            sweep_interval: Duration::from_secs(60),
            growth_tick_interval: None,
        }
    }
}

/// Main runtime that hosts player sessions
///
/// Design: Runtime owns workers and coordinates execution.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    registry: Arc<SessionRegistry>,
    shutdown_tx: watch::Sender<bool>,

    // Background workers
    sweeper_handle: Option<JoinHandle<()>>,
    growth_handle: Option<JoinHandle<()>>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Stop the periodic workers and every session worker. Records stay in
    /// the repository.
    pub async fn shutdown(self) -> Result<()> {
        // Receivers may already be gone if a worker panicked.
        let _ = self.shutdown_tx.send(true);

        if let Some(sweeper) = self.sweeper_handle {
            sweeper.await.map_err(RuntimeError::WorkerJoin)?;
        }
        if let Some(growth) = self.growth_handle {
            growth.await.map_err(RuntimeError::WorkerJoin)?;
        }

        self.registry.shutdown_all().await?;
        info!("runtime stopped");
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    repository: Option<Arc<dyn SessionRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            repository: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Use a custom session store. Defaults to [`InMemorySessionRepo`].
    pub fn repository(mut self, repository: Arc<dyn SessionRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Override only the farm rules configuration
    pub fn game_config(mut self, game_config: GameConfig) -> Self {
        self.config.game_config = game_config;
        self
    }

    /// Build the runtime. Must be called inside a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        let repository = self
            .repository
            .unwrap_or_else(|| Arc::new(InMemorySessionRepo::new()));

        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let registry = Arc::new(SessionRegistry::new(
            repository,
            event_bus.clone(),
            self.config.game_config.clone(),
            self.config.command_buffer_size,
        ));
        let handle = RuntimeHandle::new(Arc::clone(&registry), event_bus);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let sweeper_handle = self.config.session_idle_ttl.map(|ttl| {
            let sweeper = IdleSweeper::new(
                handle.clone(),
                ttl,
                self.config.sweep_interval,
                shutdown_rx.clone(),
            );
            tokio::spawn(async move {
                sweeper.run().await;
            })
        });

        let growth_handle = self.config.growth_tick_interval.map(|interval| {
            let ticker = GrowthTicker::new(handle.clone(), interval, shutdown_rx.clone());
            tokio::spawn(async move {
                ticker.run().await;
            })
        });

        info!(
            farm_width = self.config.game_config.farm_width,
            farm_height = self.config.game_config.farm_height,
            idle_ttl = ?self.config.session_idle_ttl,
            growth_tick = ?self.config.growth_tick_interval,
            "runtime started"
        );

        Ok(Runtime {
            handle,
            registry,
            shutdown_tx,
            sweeper_handle,
            growth_handle,
        })
    }
}
