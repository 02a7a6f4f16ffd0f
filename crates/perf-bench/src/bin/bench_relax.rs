use std::hint::black_box;
use std::time::Instant;

use negcycle_core::relax;
use perf_bench::*;

fn main() {
    let mut edges = generate_nonnegative_edges(NUM_NODES, NUM_EDGES, SEED);
    let graph = match build_graph(NUM_NODES, &mut edges) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("generated graph is invalid: {}", e);
            std::process::exit(1);
        }
    };

    let start_time = Instant::now();
    let outcome = match relax(&graph, 0) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("relax failed: {}", e);
            std::process::exit(1);
        }
    };
    let elapsed_time = start_time.elapsed();

    // Reachable distances summed so the work cannot be optimised away.
    let checksum: f64 = black_box(outcome.distances.iter().filter(|d| d.is_finite()).sum());

    println!(
        "--- relax Benchmark Results ({} Nodes, {} Edges) ---",
        NUM_NODES, NUM_EDGES
    );
    println!("Rounds: {} ({:?})", outcome.rounds, outcome.stop);
    println!("Checksum: {:.6}", checksum);
    println!("Elapsed Time: {:?}", elapsed_time);
}
