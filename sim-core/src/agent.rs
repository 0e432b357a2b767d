use crate::grid::{euclidean_distance, is_close, von_neumann_neighborhood, DISTANCE_REL_TOLERANCE};
use crate::Simulation;
use rand::seq::IndexedRandom;
use sim_types::CAPACITY;

impl Simulation {
    /// Moves the agent to the richest empty cell within its vision, preferring
    /// the nearest among equally rich cells. The agent's own cell is occupied
    /// by the agent itself and is never a target. Returns whether it moved.
    pub(crate) fn move_agent(&mut self, idx: usize) -> bool {
        let agent = &self.agents[idx];
        let origin = (agent.x, agent.y);
        let Some(origin_idx) = self.field.index(origin.0, origin.1) else {
            return false;
        };

        let candidates: Vec<((i32, i32), u8)> = von_neumann_neighborhood(
            origin,
            agent.vision,
            self.field.width(),
            self.field.height(),
        )
        .into_iter()
        .filter_map(|(x, y)| {
            let cell_idx = self.field.index(x, y)?;
            (self.occupancy[cell_idx] == 0).then(|| ((x, y), self.field.level(x, y)))
        })
        .collect();

        let Some(max_level) = candidates.iter().map(|(_, level)| *level).max() else {
            return false;
        };
        let richest: Vec<(i32, i32)> = candidates
            .into_iter()
            .filter(|(_, level)| *level == max_level)
            .map(|(position, _)| position)
            .collect();

        let min_distance = richest
            .iter()
            .map(|&position| euclidean_distance(origin, position))
            .fold(f64::INFINITY, f64::min);
        let nearest: Vec<(i32, i32)> = richest
            .into_iter()
            .filter(|&position| {
                is_close(
                    euclidean_distance(origin, position),
                    min_distance,
                    DISTANCE_REL_TOLERANCE,
                )
            })
            .collect();

        let Some(&target) = nearest.choose(&mut self.rng) else {
            return false;
        };
        let Some(target_idx) = self.field.index(target.0, target.1) else {
            return false;
        };

        self.occupancy[origin_idx] -= 1;
        self.occupancy[target_idx] += 1;
        let agent = &mut self.agents[idx];
        agent.x = target.0;
        agent.y = target.1;
        true
    }

    /// Harvests the whole cell, then pays metabolism. Returns the harvest.
    pub(crate) fn gather_and_eat(&mut self, idx: usize) -> u8 {
        let agent = &mut self.agents[idx];
        let harvested = match self.field.cell_mut(agent.x, agent.y) {
            Some(cell) => std::mem::take(&mut cell.resource_level),
            None => 0,
        };
        agent.holdings += i64::from(harvested);
        agent.holdings -= i64::from(agent.metabolism);
        harvested
    }

    /// Returns surplus to the current cell. An agent never plants into its
    /// next round's metabolism. Returns the amount planted.
    pub(crate) fn plant_sugar(&mut self, idx: usize) -> u8 {
        let agent = &mut self.agents[idx];
        let surplus = agent.holdings - i64::from(agent.metabolism);
        if surplus <= 0 {
            return 0;
        }
        let Some(cell) = self.field.cell_mut(agent.x, agent.y) else {
            return 0;
        };

        let headroom = CAPACITY.saturating_sub(cell.resource_level);
        let ceiling = cell.fertility.yield_units();
        let amount = surplus.min(i64::from(headroom)).min(i64::from(ceiling)).max(0) as u8;
        if amount == 0 {
            return 0;
        }

        cell.resource_level += amount;
        cell.planted_this_round = true;
        agent.holdings -= i64::from(amount);
        amount
    }

    pub(crate) fn see_if_die(&self, idx: usize) -> bool {
        self.agents[idx].holdings <= 0
    }
}
