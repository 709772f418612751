//! Authoritative farm state representation.
//!
//! This module owns the tile, grid, and session data structures. Runtime
//! layers clone or query this state but mutate it exclusively through
//! [`FarmEngine`](crate::engine::FarmEngine).
mod common;
mod farm;
mod session;
mod tile;

pub use common::{ScreenPoint, TilePosition, Timestamp};
pub use farm::FarmGrid;
pub use session::{CameraDelta, GameSession, Resources};
pub use tile::{Crop, Soil, SurfaceKind, Tile};
