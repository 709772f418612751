//! Stateless rule engine for a single tile.
//!
//! Transitions collapse to one chain per tile:
//!
//! ```text
//! Grass --Till--> Tilled(dry) --Water--> Tilled(wet) --Plant--> Planted(stage 1..=MAX)
//!   ^                                                                     |
//!   +------------------------------- Harvest (stage == MAX) --------------+
//! ```
//!
//! Every forward edge is gated by exactly one tool. Stage advancement inside
//! `Planted` is driven by [`advance_growth`], never by a tool.

use crate::config::GameConfig;
use crate::state::{Crop, Soil, Tile, Timestamp};

use super::Tool;

/// Result of applying a tool to a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMutation {
    pub applied: bool,
    pub harvest_value: u64,
}

impl TileMutation {
    pub const REJECTED: Self = Self {
        applied: false,
        harvest_value: 0,
    };

    const fn applied(harvest_value: u64) -> Self {
        Self {
            applied: true,
            harvest_value,
        }
    }
}

/// Returns whether `tool` may be applied to `tile`.
///
/// Seed availability for [`Tool::Plant`] is not a tile property and is checked
/// by the caller.
pub fn can_apply(tile: &Tile, tool: Tool) -> bool {
    match (tool, tile) {
        (Tool::Till, Tile::Grass) => true,
        (Tool::Water, Tile::Tilled(soil)) => !soil.watered,
        (Tool::Plant, Tile::Tilled(soil)) => soil.watered,
        (Tool::Harvest, Tile::Planted(crop)) => crop.growth_stage >= GameConfig::MAX_GROWTH_STAGE,
        _ => false,
    }
}

/// Applies `tool` to `tile` in place.
///
/// A failed precondition is a no-op returning [`TileMutation::REJECTED`]; the
/// tile is left untouched.
pub fn apply(tile: &mut Tile, tool: Tool, now: Timestamp) -> TileMutation {
    if !can_apply(tile, tool) {
        return TileMutation::REJECTED;
    }

    match tool {
        Tool::Till => {
            *tile = Tile::Tilled(Soil::DRY);
            TileMutation::applied(0)
        }
        Tool::Water => {
            if let Tile::Tilled(soil) = tile {
                soil.watered = true;
                soil.last_watered_at = Some(now);
            }
            TileMutation::applied(0)
        }
        Tool::Plant => {
            let soil = tile.soil().copied().unwrap_or_default();
            *tile = Tile::Planted(Crop {
                soil,
                growth_stage: 1,
                growth_ticks: 0,
                growth_ticks_required: GameConfig::PLANT_GROWTH_TICKS,
            });
            TileMutation::applied(0)
        }
        Tool::Harvest => {
            let value = harvest_value(tile.growth_stage());
            tile.clear();
            TileMutation::applied(value)
        }
    }
}

/// Energy spent by a successful use of `tool`.
pub const fn energy_cost(tool: Tool) -> u32 {
    tool.energy_cost()
}

/// Money earned by harvesting a crop at `growth_stage`.
pub const fn harvest_value(growth_stage: u8) -> u64 {
    GameConfig::BASE_HARVEST_VALUE + growth_stage as u64 * GameConfig::HARVEST_VALUE_PER_STAGE
}

/// Advances a planted crop by one tick.
///
/// Returns `true` when the crop moved up a stage. Tiles without a crop and
/// fully grown crops are left unchanged.
pub fn advance_growth(tile: &mut Tile) -> bool {
    let Some(crop) = tile.crop_mut() else {
        return false;
    };
    if crop.growth_stage >= GameConfig::MAX_GROWTH_STAGE {
        return false;
    }

    crop.growth_ticks += 1;
    if crop.growth_ticks >= crop.growth_ticks_required {
        crop.growth_stage += 1;
        crop.growth_ticks = 0;
        return true;
    }
    false
}
