use crate::config::GameConfig;
use crate::projection;

use super::common::{ScreenPoint, TilePosition};
use super::farm::FarmGrid;
use crate::action::Tool;

/// Player resources spent and earned by farming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources {
    /// Always within `0..=max_energy`.
    pub energy: u32,
    pub max_energy: u32,
    pub money: u64,
    pub seeds: u32,
    /// In-game day counter, starting at 1.
    pub day: u32,
    /// Last tool selected or successfully used.
    pub current_tool: Tool,
}

impl Resources {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            energy: config.max_energy,
            max_energy: config.max_energy,
            money: config.starting_money,
            seeds: config.starting_seeds,
            day: 1,
            current_tool: Tool::default(),
        }
    }
}

/// Partial camera update; absent fields keep their current value.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraDelta {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// One player's complete mutable game state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameSession {
    pub resources: Resources,
    pub farm: FarmGrid,
    /// View transform only. See [`crate::projection`] for the sign convention.
    pub camera: ScreenPoint,
}

impl GameSession {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            resources: Resources::from_config(config),
            farm: FarmGrid::new(config.farm_width, config.farm_height),
            camera: ScreenPoint::ZERO,
        }
    }

    /// Resolves a click at `screen` to a farm tile using this session's camera.
    pub fn pick_tile(&self, screen: ScreenPoint, origin: ScreenPoint) -> Option<TilePosition> {
        projection::screen_to_tile(
            screen,
            origin,
            self.camera,
            self.farm.width(),
            self.farm.height(),
        )
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
