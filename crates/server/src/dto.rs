//! Request bodies and wire views.
//!
//! Requests are parsed here into typed values before they reach the runtime.
//! Views flatten the tagged tile variant into the booleans the browser client
//! reads (`watered`, `planted`) and keep its field names.

use chrono::{DateTime, Utc};
use farm_core::{AvatarInput, CameraDelta, ScreenPoint, SurfaceKind, Tile, Timestamp, Tool};
use farm_runtime::{PlayerProfile, SessionRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Builds avatar input from an arbitrary JSON body. Fields that are missing
/// or not strings are left empty so validation reports them.
pub fn avatar_input(body: &Value) -> AvatarInput {
    let field = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_owned);

    AvatarInput {
        name: field("name"),
        body_type: field("bodyType"),
        hair_style: field("hairStyle"),
        hair_color: field("hairColor"),
        skin_tone: field("skinTone"),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseToolRequest {
    pub tool: String,
    pub tile_x: i64,
    pub tile_y: i64,
}

impl UseToolRequest {
    /// Coordinates narrowed to the grid's integer type. Values beyond it are
    /// saturated, which keeps them out of bounds.
    pub fn target(&self) -> (i32, i32) {
        (saturate(self.tile_x), saturate(self.tile_y))
    }
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameStateRequest {
    #[serde(default)]
    pub game_state: GameStatePatch,
}

#[derive(Debug, Default, Deserialize)]
pub struct GameStatePatch {
    pub camera: Option<CameraDelta>,
    pub game: Option<GamePatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePatch {
    pub current_tool: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickTileRequest {
    pub screen_x: f64,
    pub screen_y: f64,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl PickTileRequest {
    pub fn screen(&self) -> ScreenPoint {
        ScreenPoint::new(self.screen_x, self.screen_y)
    }

    pub fn origin(&self) -> ScreenPoint {
        ScreenPoint::new(self.origin_x, self.origin_y)
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    pub player: PlayerProfile,
    pub game: GameDataView,
    pub farm: FarmView,
    pub camera: CameraView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameDataView {
    pub day: u32,
    pub money: u64,
    pub energy: u32,
    pub max_energy: u32,
    pub seeds: u32,
    pub current_tool: Tool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FarmView {
    /// Row-major: `tiles[y][x]`.
    pub tiles: Vec<Vec<TileView>>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    #[serde(rename = "type")]
    pub kind: SurfaceKind,
    pub watered: bool,
    pub planted: bool,
    pub growth_stage: u8,
    pub growth_time: u32,
    pub max_growth_time: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_watered: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CameraView {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TilePositionView {
    pub x: i32,
    pub y: i32,
}

impl From<&SessionRecord> for GameStateView {
    fn from(record: &SessionRecord) -> Self {
        let resources = &record.game.resources;
        let farm = &record.game.farm;

        Self {
            player: record.player.clone(),
            game: GameDataView {
                day: resources.day,
                money: resources.money,
                energy: resources.energy,
                max_energy: resources.max_energy,
                seeds: resources.seeds,
                current_tool: resources.current_tool,
            },
            farm: FarmView {
                tiles: farm
                    .rows()
                    .map(|row| row.iter().map(TileView::from).collect())
                    .collect(),
                width: farm.width(),
                height: farm.height(),
            },
            camera: CameraView {
                x: record.game.camera.x,
                y: record.game.camera.y,
            },
        }
    }
}

impl From<&Tile> for TileView {
    fn from(tile: &Tile) -> Self {
        Self {
            kind: tile.surface(),
            watered: tile.is_watered(),
            planted: tile.is_planted(),
            growth_stage: tile.growth_stage(),
            growth_time: tile.growth_ticks(),
            max_growth_time: tile.growth_ticks_required(),
            last_watered: tile.last_watered_at().and_then(to_datetime),
        }
    }
}

fn to_datetime(timestamp: Timestamp) -> Option<DateTime<Utc>> {
    i64::try_from(timestamp.as_millis())
        .ok()
        .and_then(DateTime::from_timestamp_millis)
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPayload {
    pub player: PlayerProfile,
    pub game_state: GameStateView,
}

impl From<&SessionRecord> for PlayerPayload {
    fn from(record: &SessionRecord) -> Self {
        Self {
            player: record.player.clone(),
            game_state: GameStateView::from(record),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatePayload {
    pub game_state: GameStateView,
}

impl From<&SessionRecord> for GameStatePayload {
    fn from(record: &SessionRecord) -> Self {
        Self {
            game_state: GameStateView::from(record),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUsePayload {
    pub success: bool,
    pub energy_cost: u32,
    pub harvest_value: u64,
    pub game_state: GameStateView,
}

#[derive(Debug, Serialize)]
pub struct PickTilePayload {
    pub tile: Option<TilePositionView>,
}

#[derive(Debug, Serialize)]
pub struct DeletedPayload {
    pub deleted: bool,
}
