use super::*;
use sim_types::PlacementPolicy;

pub(super) fn test_config(width: u32, height: u32, population: u32) -> WorldConfig {
    WorldConfig {
        width,
        height,
        initial_population: population,
        endowment_min: 5,
        endowment_max: 5,
        metabolism_min: 1,
        metabolism_max: 1,
        vision_min: 1,
        vision_max: 1,
        cultivation_enabled: true,
        regrowth_policy: RegrowthPolicy::FertilityFeedback,
        placement: PlacementPolicy::Exclusive,
    }
}

/// A world with no agents and no resource anywhere.
pub(super) fn empty_sim(width: u32, height: u32) -> Simulation {
    empty_sim_with(test_config(width, height, 0))
}

pub(super) fn empty_sim_with(config: WorldConfig) -> Simulation {
    let map = ResourceMap::uniform(config.width, config.height, 0);
    Simulation::new(config, map, 7).expect("simulation should initialize")
}

/// A world whose field never regrows on its own, so tests control every level.
pub(super) fn frozen_sim(width: u32, height: u32) -> Simulation {
    let mut config = test_config(width, height, 0);
    config.regrowth_policy = RegrowthPolicy::PlantedOnly;
    config.cultivation_enabled = false;
    empty_sim_with(config)
}

pub(super) fn make_agent(
    id: u64,
    x: i32,
    y: i32,
    holdings: i64,
    metabolism: u32,
    vision: u32,
) -> AgentState {
    AgentState {
        id: AgentId(id),
        x,
        y,
        holdings,
        metabolism,
        vision,
    }
}

pub(super) fn configure_sim(sim: &mut Simulation, agents: Vec<AgentState>) {
    sim.next_agent_id = agents.iter().map(|a| a.id.0 + 1).max().unwrap_or(0);
    sim.agents = agents;
    sim.occupancy.fill(0);
    for agent in &sim.agents {
        let idx = sim
            .field
            .index(agent.x, agent.y)
            .expect("test agent must be placed in bounds");
        sim.occupancy[idx] += 1;
    }
}

pub(super) fn set_cell(sim: &mut Simulation, x: i32, y: i32, level: u8, fertility: Fertility) {
    let cell = sim.field.cell_mut(x, y).expect("test cell must be in bounds");
    cell.resource_level = level;
    cell.fertility = fertility;
}

pub(super) fn position(sim: &Simulation, id: u64) -> (i32, i32) {
    let agent = agent(sim, id);
    (agent.x, agent.y)
}

pub(super) fn agent(sim: &Simulation, id: u64) -> &AgentState {
    sim.agents
        .iter()
        .find(|agent| agent.id == AgentId(id))
        .expect("agent should be alive")
}

pub(super) fn agent_index(sim: &Simulation, id: u64) -> usize {
    sim.agents
        .iter()
        .position(|agent| agent.id == AgentId(id))
        .expect("agent should be alive")
}

pub(super) fn field_from_levels(
    width: u32,
    height: u32,
    levels: Vec<u8>,
    policy: RegrowthPolicy,
) -> ResourceField {
    ResourceField::from_map(
        &ResourceMap {
            width,
            height,
            levels,
        },
        policy,
    )
}
