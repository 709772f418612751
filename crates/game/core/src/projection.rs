//! Isometric projection between tile coordinates and screen pixels.
//!
//! Camera convention: the camera offset is *added* to every projected tile
//! position, so a positive `x` offset draws the whole farm further right and a
//! positive `y` offset draws it further down. The inverse transform subtracts
//! the same offset. Every call site passes the stored camera unchanged; nobody
//! negates it.

use crate::config::GameConfig;
use crate::state::{ScreenPoint, TilePosition};

const HALF_WIDTH: f64 = GameConfig::TILE_WIDTH / 2.0;
const HALF_HEIGHT: f64 = GameConfig::TILE_HEIGHT / 2.0;

/// Projects a (possibly fractional, possibly off-grid) tile coordinate to the
/// screen position of the tile's centre.
pub fn tile_to_screen(
    tile_x: f64,
    tile_y: f64,
    origin: ScreenPoint,
    camera: ScreenPoint,
) -> ScreenPoint {
    ScreenPoint {
        x: origin.x + (tile_x - tile_y) * HALF_WIDTH + camera.x,
        y: origin.y + (tile_x + tile_y) * HALF_HEIGHT + camera.y,
    }
}

/// Projects an in-grid tile position. Convenience over [`tile_to_screen`].
pub fn position_to_screen(
    position: TilePosition,
    origin: ScreenPoint,
    camera: ScreenPoint,
) -> ScreenPoint {
    tile_to_screen(f64::from(position.x), f64::from(position.y), origin, camera)
}

/// Hit-tests a screen point against a `width x height` grid.
///
/// Returns `None` when the point resolves to a tile outside the grid. Ties on
/// exact diamond edges round half away from zero.
pub fn screen_to_tile(
    screen: ScreenPoint,
    origin: ScreenPoint,
    camera: ScreenPoint,
    width: u32,
    height: u32,
) -> Option<TilePosition> {
    let adj_x = (screen.x - origin.x - camera.x) / HALF_WIDTH;
    let adj_y = (screen.y - origin.y - camera.y) / HALF_HEIGHT;

    let tile_x = ((adj_x + adj_y) / 2.0).round();
    let tile_y = ((adj_y - adj_x) / 2.0).round();

    let in_range =
        |value: f64, limit: u32| value.is_finite() && value >= 0.0 && value < f64::from(limit);
    if in_range(tile_x, width) && in_range(tile_y, height) {
        Some(TilePosition::new(tile_x as i32, tile_y as i32))
    } else {
        None
    }
}
