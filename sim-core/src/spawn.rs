use crate::grid::position_of;
use crate::Simulation;
use rand::seq::SliceRandom;
use rand::Rng;
use sim_types::{AgentId, AgentState, PlacementPolicy};

impl Simulation {
    pub(crate) fn spawn_initial_population(&mut self) {
        let population = self.config.initial_population as usize;
        let width = self.config.width;
        let height = self.config.height;

        let positions: Vec<(i32, i32)> = match self.config.placement {
            PlacementPolicy::Exclusive => {
                let mut open: Vec<(i32, i32)> = (0..self.config.cell_count())
                    .map(|idx| position_of(idx, width))
                    .collect();
                open.shuffle(&mut self.rng);
                open.truncate(population);
                open
            }
            PlacementPolicy::AllowCoLocation => (0..population)
                .map(|_| {
                    (
                        self.rng.random_range(0..width) as i32,
                        self.rng.random_range(0..height) as i32,
                    )
                })
                .collect(),
        };

        for (x, y) in positions {
            let agent = AgentState {
                id: self.alloc_agent_id(),
                x,
                y,
                holdings: self
                    .rng
                    .random_range(self.config.endowment_min..=self.config.endowment_max),
                metabolism: self
                    .rng
                    .random_range(self.config.metabolism_min..=self.config.metabolism_max),
                vision: self
                    .rng
                    .random_range(self.config.vision_min..=self.config.vision_max),
            };
            self.add_agent(agent);
        }
    }

    fn alloc_agent_id(&mut self) -> AgentId {
        let id = AgentId(self.next_agent_id);
        self.next_agent_id += 1;
        id
    }

    fn add_agent(&mut self, agent: AgentState) {
        let Some(idx) = self.field.index(agent.x, agent.y) else {
            return;
        };
        self.occupancy[idx] += 1;
        self.agents.push(agent);
    }
}
