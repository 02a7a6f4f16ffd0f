/// Type alias for a single weighted directed edge: (from, to, weight)
pub type Edge = (usize, usize, f64);

/// Represents a cycle in a weighted directed graph.
///
/// Fields:
/// - `vertices`: The cycle in edge order; `vertices[i] -> vertices[i + 1]` is an edge,
///   and the last vertex links back to the first.
/// - `path`: The edges `(u, v, weight)` traversed, in the same order.
/// - `total_weight`: Sum of the edge weights along the cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedCycle {
    pub vertices: Vec<usize>,
    pub path: Vec<Edge>,
    pub total_weight: f64,
}

impl WeightedCycle {
    /// Returns true if walking the cycle lowers the path cost.
    pub fn is_negative(&self) -> bool {
        self.total_weight < 0.0
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
