//! Deterministic farm rules and data types shared by the runtime and server.
//!
//! `farm-core` defines the tile state machine, the isometric projection used
//! for rendering and hit-testing, and the per-player session aggregate. It
//! performs no I/O and never reads a clock. All session mutation flows through
//! [`engine::FarmEngine`].
pub mod action;
pub mod avatar;
pub mod config;
pub mod engine;
pub mod error;
pub mod projection;
pub mod state;

pub use action::{Tool, ToolError, ToolUse, ToolUseResult, UnknownTool};
pub use avatar::{Avatar, AvatarInput, BodyType, HairStyle, ValidationError};
pub use config::GameConfig;
pub use engine::FarmEngine;
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use state::{
    CameraDelta, Crop, FarmGrid, GameSession, Resources, ScreenPoint, Soil, SurfaceKind, Tile,
    TilePosition, Timestamp,
};
