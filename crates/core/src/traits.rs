use super::bellman_ford::{StopReason, relax, weigh_cycle};
use super::csr::GraphCSR;
use common::{error::Error, types::WeightedCycle};

/// Trait for graph solvers capable of detecting negative cycles.
pub trait GraphSolver {
    /// Detects a negative cycle reachable from `source`.
    ///
    /// Returns `Ok(Some(cycle))` if a negative cycle is found,
    /// `Ok(None)` if none exists, or `Err(e)` on failure.
    fn find_negative_cycle(
        &self,
        graph: &GraphCSR,
        source: usize,
    ) -> Result<Option<WeightedCycle>, Error>;
}

/// [`GraphSolver`] backed by the early-stopping Bellman-Ford in [`relax`].
#[derive(Debug, Default, Clone, Copy)]
pub struct BellmanFordSolver;

impl GraphSolver for BellmanFordSolver {
    fn find_negative_cycle(
        &self,
        graph: &GraphCSR,
        source: usize,
    ) -> Result<Option<WeightedCycle>, Error> {
        let outcome = relax(graph, source)?;

        match outcome.stop {
            StopReason::Converged => Ok(None),
            StopReason::CycleFound => weigh_cycle(graph, &outcome.cycle)
                .map(Some)
                .ok_or(Error::CycleReconstructionFailed),
            StopReason::RoundLimit => Err(Error::AmbiguousResult {
                rounds: outcome.rounds,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solver_returns_weighted_cycle() {
        let mut edges = vec![(0, 1, 2.0), (1, 2, 1.0), (2, 1, -2.0)];
        let graph = GraphCSR::from_edges(3, &mut edges).unwrap();

        let cycle = BellmanFordSolver
            .find_negative_cycle(&graph, 0)
            .unwrap()
            .expect("cycle expected");

        assert_eq!(cycle.len(), 2);
        assert_eq!(cycle.total_weight, -1.0);
        assert!(cycle.vertices.contains(&1) && cycle.vertices.contains(&2));
    }

    #[test]
    fn solver_ignores_cycle_unreachable_from_source() {
        let mut edges = vec![(0, 1, 2.0), (2, 3, 1.0), (3, 2, -2.0)];
        let graph = GraphCSR::from_edges(4, &mut edges).unwrap();

        assert_eq!(BellmanFordSolver.find_negative_cycle(&graph, 0), Ok(None));
        assert!(BellmanFordSolver.find_negative_cycle(&graph, 2).unwrap().is_some());
    }

    #[test]
    fn solver_propagates_input_errors() {
        let graph = GraphCSR::empty(0);
        assert_eq!(
            BellmanFordSolver.find_negative_cycle(&graph, 0),
            Err(Error::EmptyGraph)
        );
    }
}
