use crate::action::rules;

use super::common::TilePosition;
use super::tile::Tile;

/// Rectangular, row-major grid of tiles with fixed dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FarmGrid {
    width: u32,
    height: u32,
    tiles: Vec<Tile>,
}

impl FarmGrid {
    /// Allocates `width * height` grass tiles.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::Grass; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns whether `position` lies inside `[0, width) x [0, height)`.
    pub fn contains(&self, position: TilePosition) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    fn index(&self, position: TilePosition) -> Option<usize> {
        self.contains(position)
            .then(|| position.y as usize * self.width as usize + position.x as usize)
    }

    pub fn tile(&self, position: TilePosition) -> Option<&Tile> {
        self.index(position).map(|index| &self.tiles[index])
    }

    pub fn tile_mut(&mut self, position: TilePosition) -> Option<&mut Tile> {
        self.index(position).map(|index| &mut self.tiles[index])
    }

    /// Exclusive access to an in-bounds tile.
    ///
    /// # Panics
    ///
    /// Panics when `position` is outside the grid. Callers bounds-check with
    /// [`FarmGrid::contains`] first.
    pub fn tile_at(&mut self, position: TilePosition) -> &mut Tile {
        let (width, height) = (self.width, self.height);
        self.tile_mut(position).unwrap_or_else(|| {
            panic!("tile {position} out of bounds for {width}x{height} farm")
        })
    }

    /// Iterates rows top to bottom, each row left to right.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width.max(1) as usize)
    }

    /// Iterates every tile with its position, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TilePosition, &Tile)> {
        let width = self.width.max(1) as usize;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let position = TilePosition::new((index % width) as i32, (index / width) as i32);
            (position, tile)
        })
    }

    /// Runs one growth tick on every tile. Tiles do not interact, so order is
    /// irrelevant. Returns how many crops moved up a stage.
    pub fn advance_all_growth(&mut self) -> usize {
        self.tiles
            .iter_mut()
            .map(rules::advance_growth)
            .filter(|advanced| *advanced)
            .count()
    }
}
