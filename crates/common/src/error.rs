use thiserror::Error;

/// Input and algorithm failures shared by every solver in the workspace.
///
/// All variants are terminal for the call that produced them; the computations
/// are deterministic so there is nothing to retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Indicates an attempt to access a node index that exceeds the graph size (N).
    #[error("Node index {0} is out of bounds.")]
    NodeIndexOutOfBounds(usize),

    /// The graph has no vertices, so there is no valid source.
    #[error("Graph has no vertices.")]
    EmptyGraph,

    /// An edge names an endpoint outside `0..n`.
    #[error("Edge ({0}, {1}) references a vertex outside the graph.")]
    DanglingEdge(usize, usize),

    /// Edge weights must be finite; infinity is reserved for "unreachable".
    #[error("Edge ({from}, {to}) has non-finite weight {weight}.")]
    NonFiniteWeight { from: usize, to: usize, weight: f64 },

    /// The algorithm requires non-negative weights.
    #[error("Edge ({from}, {to}) has negative weight {weight}.")]
    NegativeWeight { from: usize, to: usize, weight: f64 },

    /// The algorithm requires every edge to have a reverse edge.
    #[error("Graph is not undirected: edge ({0}, {1}) has no reverse.")]
    NotUndirected(usize, usize),

    /// Distances were still changing after the last round, but no cycle could be
    /// located in the parent map.
    #[error("Round limit {rounds} reached with distances still changing and no cycle in the parent map.")]
    AmbiguousResult { rounds: usize },

    /// Failed to trace the full cycle path, usually due to broken predecessor chains.
    #[error("Cycle path reconstruction failed due to broken predecessor chain.")]
    CycleReconstructionFailed,

    /// Walk counts no longer fit in 128 bits.
    #[error("Path count overflowed at length {0}.")]
    CountOverflow(usize),

    #[error("Invalid preference list: {0}")]
    InvalidPreferences(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        assert_eq!(
            Error::NodeIndexOutOfBounds(7).to_string(),
            "Node index 7 is out of bounds."
        );
        assert_eq!(
            Error::DanglingEdge(1, 9).to_string(),
            "Edge (1, 9) references a vertex outside the graph."
        );
        assert!(
            Error::AmbiguousResult { rounds: 4 }
                .to_string()
                .contains("Round limit 4")
        );
    }
}
