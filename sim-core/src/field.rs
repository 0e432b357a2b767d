use crate::grid::cell_index;
use sim_types::{CellState, FieldLayer, Fertility, RegrowthPolicy, ResourceMap, CAPACITY};

/// Extra unit a cultivated cell regrows in the round after planting.
pub const PLANTING_BONUS: u8 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RegrowthOutcome {
    pub(crate) overused_cells: u32,
}

/// Per-cell resource state on a bounded, non-wrapping grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceField {
    width: u32,
    height: u32,
    cells: Vec<CellState>,
    initial_levels: Vec<u8>,
}

impl ResourceField {
    /// Builds the field from a starting matrix. Callers validate the matrix
    /// dimensions first; levels are clamped to `CAPACITY` regardless.
    pub fn from_map(map: &ResourceMap, policy: RegrowthPolicy) -> Self {
        let initial_levels: Vec<u8> = map.levels.iter().map(|l| (*l).min(CAPACITY)).collect();
        let cells = initial_levels
            .iter()
            .map(|&resource_level| CellState {
                resource_level,
                fertility: if policy.models_fertility() {
                    Fertility::from_level(resource_level)
                } else {
                    Fertility::Full
                },
                planted_this_round: false,
            })
            .collect();

        Self {
            width: map.width,
            height: map.height,
            cells,
            initial_levels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&CellState> {
        let idx = self.index(x, y)?;
        self.cells.get(idx)
    }

    pub(crate) fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut CellState> {
        let idx = self.index(x, y)?;
        self.cells.get_mut(idx)
    }

    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        cell_index((x, y), self.width, self.height)
    }

    pub fn level(&self, x: i32, y: i32) -> u8 {
        self.cell(x, y).map_or(0, |cell| cell.resource_level)
    }

    pub fn total_resource(&self) -> u64 {
        self.cells
            .iter()
            .map(|cell| u64::from(cell.resource_level))
            .sum()
    }

    pub fn planted_count(&self) -> u32 {
        self.cells
            .iter()
            .filter(|cell| cell.planted_this_round)
            .count() as u32
    }

    /// One whole-grid regrowth transition. Consumes and clears the planted
    /// flags set since the previous pass.
    pub(crate) fn regrow(&mut self, policy: RegrowthPolicy) -> RegrowthOutcome {
        let mut outcome = RegrowthOutcome::default();

        for (cell, &initial) in self.cells.iter_mut().zip(&self.initial_levels) {
            let level = cell.resource_level;
            // Constant regrowth also pulls cells planted above their initial
            // level back down to it.
            let grown = match policy {
                RegrowthPolicy::FertilityFeedback if level == 0 => cell.fertility.yield_units(),
                RegrowthPolicy::Constant => level.saturating_add(1).min(initial),
                _ => level,
            }
            .min(CAPACITY);

            cell.resource_level = if cell.planted_this_round {
                let boosted = grown.saturating_add(PLANTING_BONUS);
                // Cultivating past capacity exhausts the soil.
                if boosted > CAPACITY {
                    outcome.overused_cells += 1;
                    0
                } else {
                    boosted
                }
            } else {
                grown
            };

            if policy.models_fertility() {
                cell.fertility = Fertility::from_level(cell.resource_level);
            }
            cell.planted_this_round = false;
        }

        outcome
    }

    /// One text row per grid row, values separated by single spaces.
    pub fn render_layer(&self, layer: FieldLayer) -> String {
        self.cells
            .chunks(self.width.max(1) as usize)
            .map(|row| {
                let values: Vec<String> = row
                    .iter()
                    .map(|cell| match layer {
                        FieldLayer::Resource => cell.resource_level.to_string(),
                        FieldLayer::Fertility => format!("{:.2}", cell.fertility.as_f32()),
                        FieldLayer::Planted => u8::from(cell.planted_this_round).to_string(),
                    })
                    .collect();
                format!("{}\n", values.join(" "))
            })
            .collect()
    }
}
