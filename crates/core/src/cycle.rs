use super::csr::GraphCSR;
use super::traversal::dijkstra;
use common::error::Error;

/// Lightest directed cycle of a graph with non-negative weights.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectedCycle {
    pub cost: f64,
    /// Cycle in edge order, starting from the vertex whose search found it.
    pub vertices: Vec<usize>,
}

/// Finds a minimum-weight directed cycle, or `None` for an acyclic graph.
///
/// Runs Dijkstra from every vertex `s` and closes the lightest path
/// `s ..u` with an edge `u -> s`. Self-loops count as cycles of one vertex.
/// Ties keep the cycle found first (lowest start vertex).
///
/// # Errors
/// Returns `Error::NegativeWeight` if any edge is negative.
pub fn shortest_directed_cycle(graph: &GraphCSR) -> Result<Option<DirectedCycle>, Error> {
    let mut best: Option<DirectedCycle> = None;

    for s in 0..graph.num_nodes {
        let (distances, parents) = dijkstra(graph, s)?;

        let mut closing: Option<(f64, usize)> = None;
        for (u, v, weight) in graph.edges() {
            if v != s {
                continue;
            }
            let Some(dist_u) = distances[u] else {
                continue;
            };
            let cost = dist_u + weight;
            if closing.is_none_or(|(c, _)| cost < c) {
                closing = Some((cost, u));
            }
        }

        let Some((cost, last)) = closing else {
            continue;
        };
        if best.as_ref().is_some_and(|b| b.cost <= cost) {
            continue;
        }

        let mut vertices = Vec::new();
        let mut node = last;
        while node != s {
            vertices.push(node);
            node = parents[node].ok_or(Error::CycleReconstructionFailed)?;
        }
        vertices.push(s);
        vertices.reverse();

        best = Some(DirectedCycle { cost, vertices });
    }

    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_lighter_of_two_cycles() {
        let mut edges = vec![
            (0, 1, 5.0),
            (1, 0, 5.0),
            (1, 2, 1.0),
            (2, 3, 1.0),
            (3, 1, 1.0),
        ];
        let graph = GraphCSR::from_edges(4, &mut edges).unwrap();

        let cycle = shortest_directed_cycle(&graph).unwrap().unwrap();

        assert_eq!(cycle.cost, 3.0);
        assert_eq!(cycle.vertices, vec![1, 2, 3]);
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let mut edges = vec![(0, 1, 1.0), (1, 0, 1.0), (2, 2, 0.5)];
        let graph = GraphCSR::from_edges(3, &mut edges).unwrap();

        let cycle = shortest_directed_cycle(&graph).unwrap().unwrap();

        assert_eq!(cycle.cost, 0.5);
        assert_eq!(cycle.vertices, vec![2]);
    }

    #[test]
    fn acyclic_graph_has_no_cycle() {
        let mut edges = vec![(0, 1, 1.0), (1, 2, 1.0), (0, 2, 1.0)];
        let graph = GraphCSR::from_edges(3, &mut edges).unwrap();

        assert_eq!(shortest_directed_cycle(&graph).unwrap(), None);
    }

    #[test]
    fn negative_weights_are_rejected() {
        let graph = GraphCSR::from_edges(2, &mut [(0, 1, -1.0), (1, 0, 3.0)]).unwrap();
        assert!(matches!(
            shortest_directed_cycle(&graph),
            Err(Error::NegativeWeight { .. })
        ));
    }
}
