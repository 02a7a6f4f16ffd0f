use serde::Serialize;

use common::types::WeightedCycle;

/// One CSV row of a sweep: the negative cycle (if any) reachable from `source`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRow {
    pub source: usize,
    pub found: bool,
    pub cycle_len: usize,
    pub cycle_weight: Option<f64>,
    /// Space-separated vertices in edge order.
    pub cycle: String,
}

impl SweepRow {
    pub fn new(source: usize, cycle: Option<&WeightedCycle>) -> Self {
        match cycle {
            Some(cycle) => SweepRow {
                source,
                found: true,
                cycle_len: cycle.len(),
                cycle_weight: Some(cycle.total_weight),
                cycle: cycle
                    .vertices
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" "),
            },
            None => SweepRow {
                source,
                found: false,
                cycle_len: 0,
                cycle_weight: None,
                cycle: String::new(),
            },
        }
    }
}
