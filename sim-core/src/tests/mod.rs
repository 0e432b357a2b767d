pub(super) use super::*;
pub(super) use crate::round::Phase;
pub(super) use sim_types::{AgentId, CellState, Fertility, RegrowthPolicy};
pub(super) use std::collections::HashSet;

mod foraging_and_planting;
mod support;
