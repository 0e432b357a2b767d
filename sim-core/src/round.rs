use crate::metrics::{collect_round_metrics, RoundCounts};
use crate::Simulation;
use rand::seq::SliceRandom;
use sim_types::RoundMetrics;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Move,
    Gather,
    Plant,
    Die,
}

impl Simulation {
    /// Advances the world by one round: regrowth, then move, gather, plant
    /// and die phases, each in its own freshly shuffled activation order.
    pub fn step(&mut self) -> RoundMetrics {
        let regrowth = self.field.regrow(self.config.regrowth_policy);

        let moved = self.run_phase(Phase::Move);
        let harvested = self.run_phase(Phase::Gather);
        let planted = if self.config.cultivation_enabled {
            self.run_phase(Phase::Plant)
        } else {
            0
        };
        let deaths = self.run_phase(Phase::Die) as u32;

        self.round = self.round.saturating_add(1);
        self.debug_assert_consistent_state();

        let metrics = collect_round_metrics(
            self.round,
            &self.agents,
            &self.field,
            RoundCounts {
                deaths,
                overused_cells: regrowth.overused_cells,
            },
        );
        debug!(
            round = self.round,
            population = metrics.population,
            moved,
            harvested,
            planted,
            deaths,
            overused = regrowth.overused_cells,
            "round complete"
        );
        if deaths > 0 && self.agents.is_empty() {
            warn!("population died out at round {}", self.round);
        }

        self.history.push(metrics.clone());
        metrics
    }

    pub fn step_n(&mut self, count: u32) -> Vec<RoundMetrics> {
        let mut records = Vec::with_capacity(count as usize);
        for _ in 0..count {
            records.push(self.step());
        }
        records
    }

    /// Applies one action to every live agent. Effects are visible to agents
    /// activated later in the same phase. Returns a per-phase tally: agents
    /// moved, units harvested, units planted, or agents removed.
    pub(crate) fn run_phase(&mut self, phase: Phase) -> u64 {
        let order = self.activation_order();
        let mut tally = 0_u64;

        match phase {
            Phase::Move => {
                for idx in order {
                    tally += u64::from(self.move_agent(idx));
                }
            }
            Phase::Gather => {
                for idx in order {
                    tally += u64::from(self.gather_and_eat(idx));
                }
            }
            Phase::Plant => {
                for idx in order {
                    tally += u64::from(self.plant_sugar(idx));
                }
            }
            Phase::Die => {
                let mut dead = vec![false; self.agents.len()];
                for idx in order {
                    if self.see_if_die(idx) {
                        dead[idx] = true;
                        self.release_cell(idx);
                        tally += 1;
                    }
                }
                let mut flags = dead.into_iter();
                self.agents.retain(|_| !flags.next().unwrap_or(false));
            }
        }

        trace!(?phase, tally, "phase applied");
        tally
    }

    /// A fresh seeded permutation of live agent indices.
    pub(crate) fn activation_order(&mut self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.agents.len()).collect();
        order.shuffle(&mut self.rng);
        order
    }

    fn release_cell(&mut self, idx: usize) {
        let agent = &self.agents[idx];
        if let Some(cell_idx) = self.field.index(agent.x, agent.y) {
            self.occupancy[cell_idx] -= 1;
        }
    }
}
