//! Graph storage and the algorithms behind the `negcycle` tools: early-stopping
//! Bellman-Ford with negative-cycle extraction, walk counting, shortest holes,
//! shortest directed cycles and stable matching.

pub mod bellman_ford;
pub mod csr;
pub mod cycle;
pub mod hole;
pub mod matching;
pub mod paths;
pub mod traits;
pub mod traversal;

pub use bellman_ford::{
    CycleDetection, RelaxOutcome, StopReason, detect_negative_cycle, relax, weigh_cycle,
};
pub use csr::GraphCSR;
