use std::hint::black_box;
use std::time::Instant;

use negcycle_core::detect_negative_cycle;
use perf_bench::*;

const CYCLE_LEN: usize = 8;

fn main() {
    let mut edges = generate_edges_with_negative_cycle(NUM_NODES, NUM_EDGES, CYCLE_LEN, SEED);
    let graph = match build_graph(NUM_NODES, &mut edges) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("generated graph is invalid: {}", e);
            std::process::exit(1);
        }
    };

    let start_time = Instant::now();
    let detection = match detect_negative_cycle(&graph) {
        Ok(detection) => detection,
        Err(e) => {
            eprintln!("detect_negative_cycle failed: {}", e);
            std::process::exit(1);
        }
    };
    let elapsed_time = start_time.elapsed();

    let detection = black_box(detection);

    println!(
        "--- detect_negative_cycle Benchmark Results ({} Nodes, {} Edges) ---",
        NUM_NODES,
        graph.num_edges()
    );
    println!("Found: {}", detection.found);
    println!("Cycle: {:?}", detection.cycle);
    println!("Elapsed Time: {:?}", elapsed_time);
}
