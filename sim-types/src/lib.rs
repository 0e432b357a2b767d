use serde::{Deserialize, Serialize};

/// Maximum resource level any cell can hold.
pub const CAPACITY: u8 = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AgentId(pub u64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RegrowthPolicy {
    /// Empty cells regrow by their fertility tier; fertility tracks usage.
    #[default]
    FertilityFeedback,
    /// Every cell regrows by one per round up to its initial level.
    Constant,
    /// Only cultivated cells regrow.
    PlantedOnly,
}

impl RegrowthPolicy {
    pub fn models_fertility(self) -> bool {
        matches!(self, RegrowthPolicy::FertilityFeedback)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlacementPolicy {
    /// One agent per cell at initialization.
    #[default]
    Exclusive,
    /// Cells are sampled with replacement, so agents may start stacked.
    AllowCoLocation,
}

/// Discretized soil productivity. Governs both regrowth and planting ceilings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Fertility {
    #[default]
    Full,
    High,
    Half,
    Low,
    Barren,
}

impl Fertility {
    pub const ALL: [Fertility; 5] = [
        Fertility::Full,
        Fertility::High,
        Fertility::Half,
        Fertility::Low,
        Fertility::Barren,
    ];

    pub fn as_f32(self) -> f32 {
        match self {
            Fertility::Full => 1.0,
            Fertility::High => 0.75,
            Fertility::Half => 0.5,
            Fertility::Low => 0.25,
            Fertility::Barren => 0.0,
        }
    }

    /// Resource units a depleted cell regains in one regrowth pass. Also the
    /// most an agent may plant on the cell in one round.
    pub fn yield_units(self) -> u8 {
        match self {
            Fertility::Full => 4,
            Fertility::High => 3,
            Fertility::Half => 2,
            Fertility::Low => 1,
            Fertility::Barren => 0,
        }
    }

    /// Fertility is inversely proportional to how full the cell is: a cell
    /// standing at capacity is barren, an emptied one is fully fertile.
    pub fn from_level(level: u8) -> Self {
        match CAPACITY.saturating_sub(level.min(CAPACITY)) {
            4 => Fertility::Full,
            3 => Fertility::High,
            2 => Fertility::Half,
            1 => Fertility::Low,
            _ => Fertility::Barren,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldConfig {
    pub width: u32,
    pub height: u32,
    pub initial_population: u32,
    pub endowment_min: i64,
    pub endowment_max: i64,
    pub metabolism_min: u32,
    pub metabolism_max: u32,
    pub vision_min: u32,
    pub vision_max: u32,
    #[serde(default = "default_cultivation_enabled")]
    pub cultivation_enabled: bool,
    #[serde(default)]
    pub regrowth_policy: RegrowthPolicy,
    #[serde(default)]
    pub placement: PlacementPolicy,
}

impl WorldConfig {
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

fn default_cultivation_enabled() -> bool {
    true
}

/// Starting resource levels, row-major with `height` rows of `width` cells.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceMap {
    pub width: u32,
    pub height: u32,
    pub levels: Vec<u8>,
}

impl ResourceMap {
    pub fn uniform(width: u32, height: u32, level: u8) -> Self {
        Self {
            width,
            height,
            levels: vec![level.min(CAPACITY); width as usize * height as usize],
        }
    }

    /// Two resource hills, one in the north-east and one in the south-west
    /// quadrant, stepping down one level per ring.
    pub fn two_peaks(width: u32, height: u32) -> Self {
        let w = width as f64;
        let h = height as f64;
        let peaks = [(w * 0.75, h * 0.25), (w * 0.25, h * 0.75)];
        let ring = (w.min(h) / 6.0).max(1.0);

        let mut levels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                let (cx, cy) = (x as f64 + 0.5, y as f64 + 0.5);
                let nearest = peaks
                    .iter()
                    .map(|(px, py)| ((cx - px).powi(2) + (cy - py).powi(2)).sqrt())
                    .fold(f64::INFINITY, f64::min);
                let drop = (nearest / ring).floor() as i64;
                levels.push((i64::from(CAPACITY) - drop).max(0) as u8);
            }
        }

        Self {
            width,
            height,
            levels,
        }
    }

    pub fn level(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.levels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentState {
    pub id: AgentId,
    pub x: i32,
    pub y: i32,
    pub holdings: i64,
    pub metabolism: u32,
    pub vision: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellState {
    pub resource_level: u8,
    pub fertility: Fertility,
    pub planted_this_round: bool,
}

impl Default for CellState {
    fn default() -> Self {
        Self {
            resource_level: 0,
            fertility: Fertility::Full,
            planted_this_round: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldLayer {
    Resource,
    Fertility,
    Planted,
}

/// One flat record per round. Statistics that need a non-empty population
/// are `None` once the world is depopulated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RoundMetrics {
    pub round: u64,
    pub population: u32,
    pub gini: Option<f64>,
    pub mean_holdings: Option<f64>,
    pub mean_metabolism: Option<f64>,
    pub total_resource: u64,
    pub deaths: u32,
    pub planted_cells: u32,
    pub overused_cells: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorldSnapshot {
    pub round: u64,
    pub rng_seed: u64,
    pub config: WorldConfig,
    pub agents: Vec<AgentState>,
    pub cells: Vec<CellState>,
    pub metrics: RoundMetrics,
}
