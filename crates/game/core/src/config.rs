/// Farm configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Number of tile columns in a freshly created farm.
    pub farm_width: u32,
    /// Number of tile rows in a freshly created farm.
    pub farm_height: u32,
    /// Energy ceiling; sessions start full and resting refills to this value.
    pub max_energy: u32,
    pub starting_money: u64,
    pub starting_seeds: u32,
}

impl GameConfig {
    // ===== isometric projection =====
    /// Horizontal span of one tile diamond in screen pixels.
    pub const TILE_WIDTH: f64 = 32.0;
    /// Vertical span of one tile diamond in screen pixels.
    pub const TILE_HEIGHT: f64 = 16.0;

    // ===== crop growth =====
    /// Growth stage at which a crop becomes harvestable. Never exceeded.
    pub const MAX_GROWTH_STAGE: u8 = 3;
    /// Ticks a planted crop needs to accumulate per growth stage.
    pub const PLANT_GROWTH_TICKS: u32 = 300;
    pub const BASE_HARVEST_VALUE: u64 = 10;
    pub const HARVEST_VALUE_PER_STAGE: u64 = 5;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_FARM_WIDTH: u32 = 20;
    pub const DEFAULT_FARM_HEIGHT: u32 = 15;
    pub const DEFAULT_MAX_ENERGY: u32 = 100;
    pub const DEFAULT_STARTING_MONEY: u64 = 100;
    pub const DEFAULT_STARTING_SEEDS: u32 = 5;

    pub fn new() -> Self {
        Self {
            farm_width: Self::DEFAULT_FARM_WIDTH,
            farm_height: Self::DEFAULT_FARM_HEIGHT,
            max_energy: Self::DEFAULT_MAX_ENERGY,
            starting_money: Self::DEFAULT_STARTING_MONEY,
            starting_seeds: Self::DEFAULT_STARTING_SEEDS,
        }
    }

    /// Overrides the farm dimensions. Zero is clamped to one so a farm always
    /// has at least one tile.
    pub fn with_farm_size(mut self, width: u32, height: u32) -> Self {
        self.farm_width = width.max(1);
        self.farm_height = height.max(1);
        self
    }

    pub fn with_starting_seeds(mut self, seeds: u32) -> Self {
        self.starting_seeds = seeds;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
