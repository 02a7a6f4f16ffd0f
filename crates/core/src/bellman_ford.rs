//! Round-based Bellman-Ford with early stopping and negative-cycle extraction.
//!
//! Each round relaxes every edge against the previous round's distances. The
//! run stops as soon as a round changes nothing (distances are final) or the
//! parent map picks up a cycle (a negative cycle reachable from the source).

use log::{debug, warn};

use super::csr::GraphCSR;
use common::{
    error::Error,
    types::{Edge, WeightedCycle},
};

/// Why a call to [`relax`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A round changed no distance; no negative cycle is reachable from the source.
    Converged,
    /// The parent map contains a cycle; it is returned in `RelaxOutcome::cycle`.
    CycleFound,
    /// Every round changed something but no cycle was located in the parent map.
    RoundLimit,
}

/// Everything [`relax`] computed.
#[derive(Debug, Clone, PartialEq)]
pub struct RelaxOutcome {
    /// Best known cost per vertex; `f64::INFINITY` when unreachable.
    pub distances: Vec<f64>,
    /// Predecessor on the best known path; `None` for the source and unreached vertices.
    pub parents: Vec<Option<usize>>,
    /// Number of rounds executed.
    pub rounds: usize,
    /// Whether the last executed round improved any distance.
    pub changed: bool,
    /// Cycle in edge order (`cycle[i] -> cycle[i + 1]`, wrapping); empty unless `CycleFound`.
    pub cycle: Vec<usize>,
    pub stop: StopReason,
}

/// Result of a single relaxation round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub distances: Vec<f64>,
    pub parents: Vec<Option<usize>>,
    /// Vertices whose distance improved this round, ascending.
    pub changed: Vec<usize>,
    /// Cycle found by following parents from the changed vertices.
    pub cycle: Option<Vec<usize>>,
}

/// Answer of [`detect_negative_cycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDetection {
    pub found: bool,
    pub cycle: Vec<usize>,
}

/// Runs one relaxation round.
///
/// Every edge `(u, v, w)` is tested against `distances[u]` from the previous
/// round and against the best value `v` has reached so far in this round. The
/// comparison is strict, so zero-weight edges never move a parent pointer.
/// Unreachable vertices hold `f64::INFINITY`, and `INFINITY + w` never wins.
pub fn relax_round(
    graph: &GraphCSR,
    distances: &[f64],
    parents: &[Option<usize>],
) -> RoundResult {
    let mut next = distances.to_vec();
    let mut next_parents = parents.to_vec();
    let mut is_changed = vec![false; graph.num_nodes];

    for (u, v, weight) in graph.edges() {
        let candidate = distances[u] + weight;
        if candidate < next[v] {
            next[v] = candidate;
            next_parents[v] = Some(u);
            is_changed[v] = true;
        }
    }

    let changed: Vec<usize> = is_changed
        .iter()
        .enumerate()
        .filter_map(|(v, &c)| c.then_some(v))
        .collect();

    let cycle = if changed.is_empty() {
        None
    } else {
        find_parent_cycle(&next_parents, &changed)
    };

    RoundResult {
        distances: next,
        parents: next_parents,
        changed,
        cycle,
    }
}

/// Looks for a cycle in the functional graph `v -> parents[v]`.
///
/// Walks parent pointers from each vertex of `starts` in turn. A walk ends at a
/// vertex without a parent, at a vertex an earlier walk already cleared, or at a
/// vertex it visited itself; the last case is a cycle. The cycle is returned in
/// edge order, ending at the vertex where the walk closed.
pub fn find_parent_cycle(parents: &[Option<usize>], starts: &[usize]) -> Option<Vec<usize>> {
    const UNVISITED: usize = usize::MAX;
    let mut walk_of = vec![UNVISITED; parents.len()];

    for (walk, &start) in starts.iter().enumerate() {
        let mut node = Some(start);
        while let Some(v) = node {
            if walk_of[v] == walk {
                return extract_cycle(parents, v);
            }
            if walk_of[v] != UNVISITED {
                break;
            }
            walk_of[v] = walk;
            node = parents[v];
        }
    }

    None
}

/// Collects the cycle through `on_cycle` by following parents until it recurs.
fn extract_cycle(parents: &[Option<usize>], on_cycle: usize) -> Option<Vec<usize>> {
    let mut cycle = vec![on_cycle];
    let mut current = parents[on_cycle]?;

    while current != on_cycle {
        cycle.push(current);
        if cycle.len() > parents.len() {
            return None;
        }
        current = parents[current]?;
    }

    // Parent walks run against the edges.
    cycle.reverse();
    Some(cycle)
}

/// Shortest-path distances and parents from `source`, stopping early.
///
/// Runs up to `n` rounds (one more than plain Bellman-Ford needs) and stops
/// after the first round that changes nothing or that leaves a cycle in the
/// parent map. If all `n` rounds change something, the whole parent map is
/// searched once more; when that also finds nothing the outcome carries
/// `StopReason::RoundLimit` and an empty cycle.
///
/// # Errors
/// - `Error::EmptyGraph` if the graph has no vertices.
/// - `Error::NodeIndexOutOfBounds` if `source` is not a vertex.
pub fn relax(graph: &GraphCSR, source: usize) -> Result<RelaxOutcome, Error> {
    if graph.num_nodes == 0 {
        return Err(Error::EmptyGraph);
    }
    if !graph.has_vertex(source) {
        return Err(Error::NodeIndexOutOfBounds(source));
    }

    let n = graph.num_nodes;
    let mut distances = vec![f64::INFINITY; n];
    distances[source] = 0.0;
    let mut parents: Vec<Option<usize>> = vec![None; n];
    let mut changed = false;

    for round in 1..=n {
        let step = relax_round(graph, &distances, &parents);
        distances = step.distances;
        parents = step.parents;
        changed = !step.changed.is_empty();

        if !changed {
            debug!("Source {}: converged after {} rounds.", source, round);
            return Ok(RelaxOutcome {
                distances,
                parents,
                rounds: round,
                changed,
                cycle: Vec::new(),
                stop: StopReason::Converged,
            });
        }

        if let Some(cycle) = step.cycle {
            debug!(
                "Source {}: parent cycle of length {} found in round {}.",
                source,
                cycle.len(),
                round
            );
            return Ok(RelaxOutcome {
                distances,
                parents,
                rounds: round,
                changed,
                cycle,
                stop: StopReason::CycleFound,
            });
        }
    }

    let every_vertex: Vec<usize> = (0..n).collect();
    match find_parent_cycle(&parents, &every_vertex) {
        Some(cycle) => {
            warn!(
                "Source {}: cycle located only by the full parent-map pass after {} rounds.",
                source, n
            );
            Ok(RelaxOutcome {
                distances,
                parents,
                rounds: n,
                changed,
                cycle,
                stop: StopReason::CycleFound,
            })
        }
        None => {
            warn!(
                "Source {}: round limit {} reached with distances still changing.",
                source, n
            );
            Ok(RelaxOutcome {
                distances,
                parents,
                rounds: n,
                changed,
                cycle: Vec::new(),
                stop: StopReason::RoundLimit,
            })
        }
    }
}

/// Decides whether the graph has any negative cycle.
///
/// Adds a virtual source with zero-weight edges to every vertex and runs
/// [`relax`] from it. The virtual source has no incoming edges, so it never
/// appears in a returned cycle. A graph without vertices has no cycle.
///
/// # Errors
/// Returns `Error::AmbiguousResult` when the round limit is reached without
/// locating a cycle.
pub fn detect_negative_cycle(graph: &GraphCSR) -> Result<CycleDetection, Error> {
    let (augmented, source) = graph.with_virtual_source();
    let outcome = relax(&augmented, source)?;

    match outcome.stop {
        StopReason::Converged => Ok(CycleDetection {
            found: false,
            cycle: Vec::new(),
        }),
        StopReason::CycleFound => Ok(CycleDetection {
            found: true,
            cycle: outcome.cycle,
        }),
        StopReason::RoundLimit => Err(Error::AmbiguousResult {
            rounds: outcome.rounds,
        }),
    }
}

/// Plain Bellman-Ford: exactly `n - 1` rounds, no early stop, no cycle check.
///
/// Distances are only meaningful when no negative cycle is reachable from
/// `source`.
pub fn bellman_ford_simple(
    graph: &GraphCSR,
    source: usize,
) -> Result<(Vec<f64>, Vec<Option<usize>>), Error> {
    if graph.num_nodes == 0 {
        return Err(Error::EmptyGraph);
    }
    if !graph.has_vertex(source) {
        return Err(Error::NodeIndexOutOfBounds(source));
    }

    let mut distances = vec![f64::INFINITY; graph.num_nodes];
    distances[source] = 0.0;
    let mut parents = vec![None; graph.num_nodes];

    for _ in 1..graph.num_nodes {
        let step = relax_round(graph, &distances, &parents);
        distances = step.distances;
        parents = step.parents;
    }

    Ok((distances, parents))
}

/// Checks that `vertices` is a cycle of `graph` and weighs it.
///
/// Consecutive vertices (wrapping around) must be joined by an edge; the
/// cheapest parallel edge is used. Returns `None` for an empty list or a
/// missing edge.
pub fn weigh_cycle(graph: &GraphCSR, vertices: &[usize]) -> Option<WeightedCycle> {
    if vertices.is_empty() {
        return None;
    }

    let mut path: Vec<Edge> = Vec::with_capacity(vertices.len());
    let mut total_weight = 0.0;

    for (i, &u) in vertices.iter().enumerate() {
        let v = vertices[(i + 1) % vertices.len()];
        let weight = graph.edge_weight(u, v)?;
        path.push((u, v, weight));
        total_weight += weight;
    }

    Some(WeightedCycle {
        vertices: vertices.to_vec(),
        path,
        total_weight,
    })
}
