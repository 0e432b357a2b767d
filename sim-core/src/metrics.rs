use crate::field::ResourceField;
use sim_types::{AgentState, RoundMetrics};

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RoundCounts {
    pub(crate) deaths: u32,
    pub(crate) overused_cells: u32,
}

/// Gini coefficient of `holdings`, or `None` when the population is empty or
/// holds nothing in total.
pub fn gini(holdings: &[i64]) -> Option<f64> {
    let n = holdings.len();
    let total: i64 = holdings.iter().sum();
    if n == 0 || total <= 0 {
        return None;
    }

    let mut sorted = holdings.to_vec();
    sorted.sort_unstable();
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(rank, &value)| value as f64 * (n - rank) as f64)
        .sum();
    let n = n as f64;
    let index = 1.0 + 1.0 / n - 2.0 * weighted / (n * total as f64);
    Some(index.clamp(0.0, 1.0))
}

fn mean(values: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let count = values.len();
    if count == 0 {
        return None;
    }
    Some(values.sum::<f64>() / count as f64)
}

pub(crate) fn collect_round_metrics(
    round: u64,
    agents: &[AgentState],
    field: &ResourceField,
    counts: RoundCounts,
) -> RoundMetrics {
    let holdings: Vec<i64> = agents.iter().map(|agent| agent.holdings).collect();

    RoundMetrics {
        round,
        population: agents.len() as u32,
        gini: gini(&holdings),
        mean_holdings: mean(holdings.iter().map(|&h| h as f64)),
        mean_metabolism: mean(agents.iter().map(|agent| f64::from(agent.metabolism))),
        total_resource: field.total_resource(),
        deaths: counts.deaths,
        planted_cells: field.planted_count(),
        overused_cells: counts.overused_cells,
    }
}
