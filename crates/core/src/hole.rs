use super::csr::GraphCSR;
use super::traversal::bfs;
use common::error::Error;

/// Shortest cycle through a given vertex of an undirected graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hole {
    /// Number of edges (equal to the number of vertices) on the cycle.
    pub length: usize,
    /// Cycle order starting at the source, which is not repeated at the end.
    pub vertices: Vec<usize>,
}

/// Finds the shortest cycle containing `source`.
///
/// A BFS from `source` labels every vertex with its branch: the child of
/// `source` its tree path goes through. An edge `(u, v)` between two different
/// branches closes a cycle `source ..u v.. source` of length `d(u) + d(v) + 1`
/// whose two halves share no vertex besides `source`. The cheapest such edge is
/// the answer; ties keep the first edge in CSR order.
///
/// # Errors
/// - `Error::NodeIndexOutOfBounds` for an unknown source.
/// - `Error::NotUndirected` if some edge lacks its reverse.
pub fn shortest_hole(graph: &GraphCSR, source: usize) -> Result<Option<Hole>, Error> {
    if let Some((u, v)) = graph.find_asymmetric_edge() {
        return Err(Error::NotUndirected(u, v));
    }
    let tree = bfs(graph, source)?;

    let mut branch: Vec<Option<usize>> = vec![None; graph.num_nodes];
    for layer in tree.layers.iter().skip(1) {
        for &v in layer {
            branch[v] = match tree.parents[v] {
                Some(p) if p == source => Some(v),
                Some(p) => branch[p],
                None => None,
            };
        }
    }

    let mut best: Option<(usize, usize, usize)> = None;
    for (u, v, _) in graph.edges() {
        if u == source || v == source || u == v {
            continue;
        }
        let (Some(bu), Some(bv)) = (branch[u], branch[v]) else {
            continue;
        };
        if bu == bv {
            continue;
        }
        let (Some(du), Some(dv)) = (tree.distances[u], tree.distances[v]) else {
            continue;
        };
        let length = du + dv + 1;
        if best.is_none_or(|(best_len, _, _)| length < best_len) {
            best = Some((length, u, v));
        }
    }

    let Some((length, u, v)) = best else {
        return Ok(None);
    };

    let climb = |start: usize| -> Vec<usize> {
        let mut chain = Vec::new();
        let mut node = Some(start);
        while let Some(x) = node {
            if x == source {
                break;
            }
            chain.push(x);
            node = tree.parents[x];
        }
        chain
    };

    let mut vertices = vec![source];
    let mut left = climb(u);
    left.reverse();
    vertices.extend(left);
    vertices.extend(climb(v));

    Ok(Some(Hole { length, vertices }))
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

    fn is_cycle(graph: &GraphCSR, vertices: &[usize]) -> bool {
        (0..vertices.len()).all(|i| {
            let u = vertices[i];
            let v = vertices[(i + 1) % vertices.len()];
            graph.edge_weight(u, v).is_some()
        })
    }

    #[test]
    fn square_is_a_hole_of_length_four() {
        let graph = undirected(4, &[(0, 1), (1, 2), (2, 3), (3, 0)]);

        let hole = shortest_hole(&graph, 0).unwrap().expect("hole expected");

        assert_eq!(hole.length, 4);
        assert_eq!(hole.vertices.len(), 4);
        assert_eq!(hole.vertices[0], 0);
        assert!(is_cycle(&graph, &hole.vertices));
    }

    #[test]
    fn picks_shorter_of_two_cycles() {
        // Triangle 0-1-2 and pentagon 0-3-4-5-6.
        let graph = undirected(
            7,
            &[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 5), (5, 6), (6, 0)],
        );

        let hole = shortest_hole(&graph, 0).unwrap().unwrap();

        assert_eq!(hole.length, 3);
        assert_eq!(hole.vertices, vec![0, 1, 2]);
    }

    #[test]
    fn cycle_not_through_source_is_ignored() {
        // Triangle 1-2-3 hangs off 0 by a single edge.
        let graph = undirected(4, &[(0, 1), (1, 2), (2, 3), (3, 1)]);

        assert_eq!(shortest_hole(&graph, 0).unwrap(), None);
        assert_eq!(shortest_hole(&graph, 2).unwrap().unwrap().length, 3);
    }

    #[test]
    fn odd_cycle_closes_on_same_layer() {
        let graph = undirected(5, &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 0)]);

        let hole = shortest_hole(&graph, 0).unwrap().unwrap();

        assert_eq!(hole.length, 5);
        assert_eq!(hole.vertices, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn tree_has_no_hole() {
        let graph = undirected(4, &[(0, 1), (0, 2), (2, 3)]);
        assert_eq!(shortest_hole(&graph, 0).unwrap(), None);
    }

    #[test]
    fn directed_graph_is_rejected() {
        let graph = GraphCSR::from_edges(2, &mut [(0, 1, 1.0)]).unwrap();
        assert_eq!(shortest_hole(&graph, 0), Err(Error::NotUndirected(0, 1)));
    }
}
