// ----------------------------
// Benchmark graphs
// ----------------------------

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use common::{error::Error, types::Edge};
use negcycle_core::GraphCSR;

pub const NUM_NODES: usize = 2_000;
pub const NUM_EDGES: usize = 20_000;
pub const SEED: u64 = 0x5eed;

/// Random graph with weights in `[0, 10)`, so relaxation always converges.
///
/// A Hamiltonian path `0 -> 1 -> ... -> n-1` is included so every vertex is
/// reachable from 0 and the round count is not trivially small.
pub fn generate_nonnegative_edges(num_nodes: usize, num_edges: usize, seed: u64) -> Vec<Edge> {
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut edges: Vec<Edge> = (0..num_nodes.saturating_sub(1))
        .map(|i| (i, i + 1, rng.random_range(0.0..10.0)))
        .collect();

    while edges.len() < num_edges {
        let from = rng.random_range(0..num_nodes);
        let to = rng.random_range(0..num_nodes);
        edges.push((from, to, rng.random_range(0.0..10.0)));
    }
    edges
}

/// Same as [`generate_nonnegative_edges`] plus one negative cycle of
/// `cycle_len` vertices at the far end of the path.
pub fn generate_edges_with_negative_cycle(
    num_nodes: usize,
    num_edges: usize,
    cycle_len: usize,
    seed: u64,
) -> Vec<Edge> {
    let mut edges = generate_nonnegative_edges(num_nodes, num_edges, seed);

    let start = num_nodes - cycle_len;
    for i in 0..cycle_len {
        let from = start + i;
        let to = start + (i + 1) % cycle_len;
        edges.push((from, to, -1.0));
    }
    edges
}

pub fn build_graph(num_nodes: usize, edges: &mut [Edge]) -> Result<GraphCSR, Error> {
    GraphCSR::from_edges(num_nodes, edges)
}
