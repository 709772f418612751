//! Player tools and the rules that decide what they do to a tile.
//!
//! [`Tool`] names the four actions a player can attempt, [`rules`] is the
//! stateless rule engine that gates and applies them to a single [`Tile`],
//! and [`ToolError`] lists the reasons a tool use is rejected at the session
//! level.
//!
//! [`Tile`]: crate::state::Tile

pub mod error;
pub mod rules;

pub use error::{ToolError, UnknownTool};
pub use rules::TileMutation;

use crate::state::TilePosition;

/// A player action attempted against one tile.
///
/// Wire names follow the browser client: tilling is `hoe`, with `till`
/// accepted as an alias.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Tool {
    /// Turns grass into tilled soil.
    #[default]
    #[strum(to_string = "hoe", serialize = "till")]
    #[cfg_attr(feature = "serde", serde(rename = "hoe", alias = "till"))]
    Till,
    Water,
    Plant,
    Harvest,
}

impl Tool {
    pub const ALL: [Tool; 4] = [Tool::Till, Tool::Water, Tool::Plant, Tool::Harvest];

    /// Energy spent when the tool is successfully applied.
    pub const fn energy_cost(self) -> u32 {
        match self {
            Tool::Till => 5,
            Tool::Water => 3,
            Tool::Plant => 2,
            Tool::Harvest => 3,
        }
    }

    /// Parses a wire name, reporting the rejected input on failure.
    pub fn parse(name: &str) -> Result<Self, UnknownTool> {
        name.parse().map_err(|_| UnknownTool(name.to_owned()))
    }
}

/// Tool-use request against a specific tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToolUse {
    pub tool: Tool,
    pub target: TilePosition,
}

impl ToolUse {
    pub fn new(tool: Tool, x: i32, y: i32) -> Self {
        Self {
            tool,
            target: TilePosition::new(x, y),
        }
    }
}

/// Outcome of a successful tool use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToolUseResult {
    pub applied: bool,
    pub energy_cost: u32,
    pub harvest_value: u64,
}
