use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sim_types::{
    AgentState, FieldLayer, PlacementPolicy, ResourceMap, RoundMetrics, WorldConfig,
    WorldSnapshot, CAPACITY,
};
use thiserror::Error;
use tracing::info;

mod agent;
mod field;
mod grid;
mod metrics;
mod round;
mod spawn;

#[cfg(test)]
mod tests;

pub use field::{ResourceField, PLANTING_BONUS};
pub use metrics::gini;

/// Largest accepted grid side. Keeps coordinates well inside `i32`.
pub const MAX_WORLD_DIMENSION: u32 = 4096;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid world config: {0}")]
    InvalidConfig(String),
    #[error("invalid resource map: {0}")]
    InvalidResourceMap(String),
}

#[derive(Debug, Clone)]
pub struct Simulation {
    config: WorldConfig,
    round: u64,
    seed: u64,
    rng: ChaCha8Rng,
    next_agent_id: u64,
    initial_map: ResourceMap,
    field: ResourceField,
    agents: Vec<AgentState>,
    /// Live agents per cell, derived from agent positions.
    occupancy: Vec<u32>,
    history: Vec<RoundMetrics>,
}

impl Simulation {
    pub fn new(config: WorldConfig, map: ResourceMap, seed: u64) -> Result<Self, SimError> {
        validate_config(&config)?;
        validate_resource_map(&config, &map)?;

        let field = ResourceField::from_map(&map, config.regrowth_policy);
        let mut sim = Self {
            occupancy: vec![0; config.cell_count()],
            config,
            round: 0,
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_agent_id: 0,
            initial_map: map,
            field,
            agents: Vec::new(),
            history: Vec::new(),
        };

        sim.populate();
        info!(
            width = sim.config.width,
            height = sim.config.height,
            population = sim.agents.len(),
            seed,
            policy = ?sim.config.regrowth_policy,
            cultivation = sim.config.cultivation_enabled,
            "world initialized"
        );
        Ok(sim)
    }

    /// Builds the world on the built-in two-peak landscape.
    pub fn with_default_landscape(config: WorldConfig, seed: u64) -> Result<Self, SimError> {
        let map = ResourceMap::two_peaks(config.width, config.height);
        Self::new(config, map, seed)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn agents(&self) -> &[AgentState] {
        &self.agents
    }

    pub fn field(&self) -> &ResourceField {
        &self.field
    }

    /// Every record since round 0, in round order.
    pub fn history(&self) -> &[RoundMetrics] {
        &self.history
    }

    pub fn metrics(&self) -> Option<&RoundMetrics> {
        self.history.last()
    }

    pub fn is_depopulated(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        let mut agents = self.agents.clone();
        agents.sort_by_key(|agent| agent.id);

        WorldSnapshot {
            round: self.round,
            rng_seed: self.seed,
            config: self.config.clone(),
            agents,
            cells: self.field.cells().to_vec(),
            metrics: self.history.last().cloned().unwrap_or_default(),
        }
    }

    pub fn reset(&mut self, seed: Option<u64>) {
        self.seed = seed.unwrap_or(self.seed);
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.round = 0;
        self.next_agent_id = 0;
        self.field = ResourceField::from_map(&self.initial_map, self.config.regrowth_policy);
        self.agents.clear();
        self.occupancy.fill(0);
        self.history.clear();
        self.populate();
    }

    /// Flat text matrix of one field layer, one grid row per line.
    pub fn dump_layer(&self, layer: FieldLayer) -> String {
        self.field.render_layer(layer)
    }

    pub fn export_metrics_jsonl(&self) -> Result<String, serde_json::Error> {
        let lines = self
            .history
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }

    fn populate(&mut self) {
        self.spawn_initial_population();
        let initial = metrics::collect_round_metrics(
            self.round,
            &self.agents,
            &self.field,
            metrics::RoundCounts::default(),
        );
        self.history.push(initial);
    }

    fn debug_assert_consistent_state(&self) {
        if cfg!(debug_assertions) {
            debug_assert_eq!(
                self.agents.len() as u64,
                self.occupancy.iter().map(|&count| u64::from(count)).sum::<u64>(),
                "occupancy count should match live agent count",
            );
            for agent in &self.agents {
                let idx = self
                    .field
                    .index(agent.x, agent.y)
                    .expect("agent position must remain in bounds");
                debug_assert!(self.occupancy[idx] > 0, "occupied cell must be counted");
                debug_assert!(agent.holdings > 0, "survivors must hold resource");
            }
            debug_assert!(self
                .field
                .cells()
                .iter()
                .all(|cell| cell.resource_level <= CAPACITY));
        }
    }
}

fn validate_config(config: &WorldConfig) -> Result<(), SimError> {
    if config.width == 0 || config.height == 0 {
        return Err(SimError::InvalidConfig(
            "width and height must be greater than zero".to_owned(),
        ));
    }
    if config.width > MAX_WORLD_DIMENSION || config.height > MAX_WORLD_DIMENSION {
        return Err(SimError::InvalidConfig(format!(
            "width and height must be at most {MAX_WORLD_DIMENSION}"
        )));
    }
    if config.endowment_min < 0 {
        return Err(SimError::InvalidConfig(
            "endowment_min must be >= 0".to_owned(),
        ));
    }
    if config.endowment_min > config.endowment_max {
        return Err(SimError::InvalidConfig(
            "endowment_min must not exceed endowment_max".to_owned(),
        ));
    }
    if config.metabolism_min == 0 {
        return Err(SimError::InvalidConfig(
            "metabolism_min must be >= 1".to_owned(),
        ));
    }
    if config.metabolism_min > config.metabolism_max {
        return Err(SimError::InvalidConfig(
            "metabolism_min must not exceed metabolism_max".to_owned(),
        ));
    }
    if config.vision_min == 0 {
        return Err(SimError::InvalidConfig("vision_min must be >= 1".to_owned()));
    }
    if config.vision_min > config.vision_max {
        return Err(SimError::InvalidConfig(
            "vision_min must not exceed vision_max".to_owned(),
        ));
    }
    if config.placement == PlacementPolicy::Exclusive
        && config.initial_population as usize > config.cell_count()
    {
        return Err(SimError::InvalidConfig(format!(
            "initial_population {} exceeds the {} cells available for exclusive placement",
            config.initial_population,
            config.cell_count()
        )));
    }
    Ok(())
}

fn validate_resource_map(config: &WorldConfig, map: &ResourceMap) -> Result<(), SimError> {
    if map.width != config.width || map.height != config.height {
        return Err(SimError::InvalidResourceMap(format!(
            "map is {}x{} but the world is {}x{}",
            map.width, map.height, config.width, config.height
        )));
    }
    if map.levels.len() != config.cell_count() {
        return Err(SimError::InvalidResourceMap(format!(
            "map holds {} levels, expected {}",
            map.levels.len(),
            config.cell_count()
        )));
    }
    if let Some(level) = map.levels.iter().find(|&&level| level > CAPACITY) {
        return Err(SimError::InvalidResourceMap(format!(
            "level {level} exceeds capacity {CAPACITY}"
        )));
    }
    Ok(())
}
