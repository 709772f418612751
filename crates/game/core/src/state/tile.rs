//! Cultivation state of a single farm cell.
//!
//! A tile is exactly one of three variants. Watering and crop data only exist
//! on the variants where they mean something, so combinations such as a
//! watered patch of grass or a crop growing on untilled ground cannot be
//! built. The flat booleans the wire format still carries are derived from
//! the variant through the accessor methods below.

use super::common::Timestamp;

/// Surface category of a tile, without the per-variant payload.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum SurfaceKind {
    Grass,
    Tilled,
    Planted,
}

/// Moisture bookkeeping for worked ground.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Soil {
    pub watered: bool,
    /// Informational only; no rule reads it.
    pub last_watered_at: Option<Timestamp>,
}

impl Soil {
    pub const DRY: Self = Self {
        watered: false,
        last_watered_at: None,
    };
}

/// A crop growing in watered soil.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Crop {
    pub soil: Soil,
    /// Maturity level in `1..=GameConfig::MAX_GROWTH_STAGE`.
    pub growth_stage: u8,
    /// Ticks accumulated toward the next stage. Reset on stage-up.
    pub growth_ticks: u32,
    /// Ticks needed per stage, fixed when the seed is planted.
    pub growth_ticks_required: u32,
}

/// One farm cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "surface", rename_all = "snake_case"))]
pub enum Tile {
    #[default]
    Grass,
    Tilled(Soil),
    Planted(Crop),
}

impl Tile {
    pub fn surface(&self) -> SurfaceKind {
        match self {
            Tile::Grass => SurfaceKind::Grass,
            Tile::Tilled(_) => SurfaceKind::Tilled,
            Tile::Planted(_) => SurfaceKind::Planted,
        }
    }

    pub fn soil(&self) -> Option<&Soil> {
        match self {
            Tile::Grass => None,
            Tile::Tilled(soil) => Some(soil),
            Tile::Planted(crop) => Some(&crop.soil),
        }
    }

    pub fn crop(&self) -> Option<&Crop> {
        match self {
            Tile::Planted(crop) => Some(crop),
            _ => None,
        }
    }

    pub fn crop_mut(&mut self) -> Option<&mut Crop> {
        match self {
            Tile::Planted(crop) => Some(crop),
            _ => None,
        }
    }

    pub fn is_watered(&self) -> bool {
        self.soil().is_some_and(|soil| soil.watered)
    }

    pub fn is_planted(&self) -> bool {
        matches!(self, Tile::Planted(_))
    }

    /// Growth stage, `0` when nothing is planted.
    pub fn growth_stage(&self) -> u8 {
        self.crop().map_or(0, |crop| crop.growth_stage)
    }

    pub fn growth_ticks(&self) -> u32 {
        self.crop().map_or(0, |crop| crop.growth_ticks)
    }

    pub fn growth_ticks_required(&self) -> u32 {
        self.crop().map_or(0, |crop| crop.growth_ticks_required)
    }

    pub fn last_watered_at(&self) -> Option<Timestamp> {
        self.soil().and_then(|soil| soil.last_watered_at)
    }

    /// Resets the tile to untouched grass.
    pub fn clear(&mut self) {
        *self = Tile::Grass;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grass_derives_empty_flags() {
        let tile = Tile::default();
        assert_eq!(tile.surface(), SurfaceKind::Grass);
        assert!(!tile.is_watered());
        assert!(!tile.is_planted());
        assert_eq!(tile.growth_stage(), 0);
        assert_eq!(tile.last_watered_at(), None);
    }

    #[test]
    fn planted_tile_reports_crop_fields() {
        let tile = Tile::Planted(Crop {
            soil: Soil {
                watered: true,
                last_watered_at: Some(Timestamp(42)),
            },
            growth_stage: 2,
            growth_ticks: 17,
            growth_ticks_required: 300,
        });

        assert_eq!(tile.surface(), SurfaceKind::Planted);
        assert!(tile.is_watered());
        assert!(tile.is_planted());
        assert_eq!(tile.growth_stage(), 2);
        assert_eq!(tile.growth_ticks(), 17);
        assert_eq!(tile.growth_ticks_required(), 300);
        assert_eq!(tile.last_watered_at(), Some(Timestamp(42)));
    }

    #[test]
    fn clear_returns_to_grass() {
        let mut tile = Tile::Tilled(Soil {
            watered: true,
            last_watered_at: Some(Timestamp(1)),
        });
        tile.clear();
        assert_eq!(tile, Tile::Grass);
    }

    #[test]
    fn surface_kind_uses_lowercase_names() {
        assert_eq!("tilled".parse::<SurfaceKind>().ok(), Some(SurfaceKind::Tilled));
        assert!("Tilled".parse::<SurfaceKind>().is_err());
        assert_eq!(SurfaceKind::Planted.as_ref(), "planted");
    }
}
