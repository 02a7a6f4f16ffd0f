use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use ordered_float::OrderedFloat;

use super::csr::GraphCSR;
use common::error::Error;

/// Breadth-first search tree from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bfs {
    /// Hop distance from the source, `None` when unreachable.
    pub distances: Vec<Option<usize>>,
    pub parents: Vec<Option<usize>>,
    /// `layers[d]` lists the vertices at hop distance `d`, in discovery order.
    pub layers: Vec<Vec<usize>>,
}

/// Unweighted traversal from `source`; edge weights are ignored.
pub fn bfs(graph: &GraphCSR, source: usize) -> Result<Bfs, Error> {
    if !graph.has_vertex(source) {
        return Err(Error::NodeIndexOutOfBounds(source));
    }

    let mut distances = vec![None; graph.num_nodes];
    let mut parents = vec![None; graph.num_nodes];
    let mut layers: Vec<Vec<usize>> = Vec::new();
    let mut queue = VecDeque::with_capacity(graph.num_nodes);

    distances[source] = Some(0);
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        let d = distances[u].unwrap_or_default();
        if layers.len() <= d {
            layers.push(Vec::new());
        }
        layers[d].push(u);

        for (v, _) in graph.outgoing(u) {
            if distances[v].is_none() {
                distances[v] = Some(d + 1);
                parents[v] = Some(u);
                queue.push_back(v);
            }
        }
    }

    Ok(Bfs {
        distances,
        parents,
        layers,
    })
}

/// Lightest paths from `source` with a binary heap.
///
/// Returns per-vertex distances (`None` when unreachable) and parents.
///
/// # Errors
/// - `Error::NodeIndexOutOfBounds` for an unknown source.
/// - `Error::NegativeWeight` if any edge of the graph is negative.
pub fn dijkstra(
    graph: &GraphCSR,
    source: usize,
) -> Result<(Vec<Option<f64>>, Vec<Option<usize>>), Error> {
    if !graph.has_vertex(source) {
        return Err(Error::NodeIndexOutOfBounds(source));
    }
    if let Some((from, to, weight)) = graph.edges().find(|&(_, _, w)| w < 0.0) {
        return Err(Error::NegativeWeight { from, to, weight });
    }

    let mut distances: Vec<Option<f64>> = vec![None; graph.num_nodes];
    let mut parents: Vec<Option<usize>> = vec![None; graph.num_nodes];
    let mut finalized = vec![false; graph.num_nodes];
    let mut heap = BinaryHeap::new();

    distances[source] = Some(0.0);
    heap.push(Reverse((OrderedFloat(0.0), source)));

    while let Some(Reverse((OrderedFloat(dist_u), u))) = heap.pop() {
        if finalized[u] {
            continue;
        }
        finalized[u] = true;

        for (v, weight) in graph.outgoing(u) {
            let candidate = dist_u + weight;
            let improves = match distances[v] {
                None => true,
                Some(current) => candidate < current,
            };
            if improves && !finalized[v] {
                distances[v] = Some(candidate);
                parents[v] = Some(u);
                heap.push(Reverse((OrderedFloat(candidate), v)));
            }
        }
    }

    Ok((distances, parents))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undirected(n: usize, pairs: &[(usize, usize)]) -> GraphCSR {
        let mut edges: Vec<_> = pairs
            .iter()
            .flat_map(|&(u, v)| [(u, v, 1.0), (v, u, 1.0)])
            .collect();
        GraphCSR::from_edges(n, &mut edges).unwrap()
    }

    #[test]
    fn bfs_builds_layers() {
        let graph = undirected(5, &[(0, 1), (0, 2), (1, 3), (2, 3)]);

        let tree = bfs(&graph, 0).unwrap();

        assert_eq!(tree.layers, vec![vec![0], vec![1, 2], vec![3]]);
        assert_eq!(tree.distances, vec![Some(0), Some(1), Some(1), Some(2), None]);
        assert_eq!(tree.parents[3], Some(1));
        assert_eq!(tree.parents[0], None);
    }

    #[test]
    fn bfs_rejects_unknown_source() {
        let graph = GraphCSR::empty(2);
        assert_eq!(bfs(&graph, 4), Err(Error::NodeIndexOutOfBounds(4)));
    }

    #[test]
    fn dijkstra_finds_lighter_detour() {
        let mut edges = vec![(0, 1, 10.0), (0, 2, 1.0), (2, 1, 2.0), (1, 3, 1.0)];
        let graph = GraphCSR::from_edges(5, &mut edges).unwrap();

        let (distances, parents) = dijkstra(&graph, 0).unwrap();

        assert_eq!(distances, vec![Some(0.0), Some(3.0), Some(1.0), Some(4.0), None]);
        assert_eq!(parents[1], Some(2));
    }

    #[test]
    fn dijkstra_rejects_negative_weights() {
        let graph = GraphCSR::from_edges(2, &mut [(0, 1, -1.0)]).unwrap();
        assert!(matches!(
            dijkstra(&graph, 0),
            Err(Error::NegativeWeight { from: 0, to: 1, .. })
        ));
    }
}
