//! Server configuration loaded from the process environment.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use farm_core::GameConfig;
use farm_runtime::RuntimeConfig;

/// Listener settings plus the runtime configuration handed to
/// [`farm_runtime::Runtime`].
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub runtime: RuntimeConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3001,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `PORT` - Listen port (default: 3001)
    /// - `BIND_ADDR` - Listen address (default: 0.0.0.0)
    /// - `FARM_WIDTH` / `FARM_HEIGHT` - Farm size for new sessions (default: 20x15)
    /// - `SESSION_IDLE_TTL_SECS` - Evict sessions idle this long; 0 disables (default: 3600)
    /// - `SESSION_SWEEP_SECS` - How often the sweeper runs (default: 60)
    /// - `GROWTH_TICK_MS` - Server-side growth cadence; unset leaves ticks to clients
    /// - `COMMAND_BUFFER` - Per-session command queue depth (default: 32)
    /// - `EVENT_BUFFER` - Event bus capacity per topic (default: 100)
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(port) = read_env::<u16>("PORT") {
            config.port = port;
        }
        if let Some(addr) = read_env::<IpAddr>("BIND_ADDR") {
            config.bind_addr = addr;
        }

        let mut game = GameConfig::default();
        let width = read_env::<u32>("FARM_WIDTH").unwrap_or(game.farm_width);
        let height = read_env::<u32>("FARM_HEIGHT").unwrap_or(game.farm_height);
        game = game.with_farm_size(width, height);
        config.runtime.game_config = game;

        if let Some(secs) = read_env::<u64>("SESSION_IDLE_TTL_SECS") {
            config.runtime.session_idle_ttl = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(secs) = read_env::<u64>("SESSION_SWEEP_SECS") {
            config.runtime.sweep_interval = Duration::from_secs(secs.max(1));
        }
        if let Some(millis) = read_env::<u64>("GROWTH_TICK_MS") {
            config.runtime.growth_tick_interval =
                (millis > 0).then(|| Duration::from_millis(millis));
        }
        if let Some(capacity) = read_env::<usize>("COMMAND_BUFFER") {
            config.runtime.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("EVENT_BUFFER") {
            config.runtime.event_buffer_size = capacity.max(1);
        }

        config
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.trim().parse().ok()
}
