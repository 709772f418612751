//! Event types for different topics.

use chrono::{DateTime, Utc};
use farm_core::{TilePosition, Tool};
use serde::{Deserialize, Serialize};

use crate::types::SessionId;

/// Session lifecycle events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    Created { session: SessionId },

    Deleted { session: SessionId },

    /// Removed by the idle sweeper.
    Evicted {
        session: SessionId,
        last_active: DateTime<Utc>,
    },
}

/// Farm activity inside one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FarmEvent {
    /// A tool use was attempted. Published for rejected attempts too, with
    /// `applied == false` and the cost that would have been charged.
    ToolUsed {
        session: SessionId,
        tool: Tool,
        position: TilePosition,
        applied: bool,
        energy_cost: u32,
    },

    CropHarvested {
        session: SessionId,
        position: TilePosition,
        harvest_value: u64,
    },

    /// One growth tick ran across the farm.
    CropsAdvanced {
        session: SessionId,
        stages_gained: usize,
    },
}
