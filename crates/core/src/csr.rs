use common::error::Error;
use common::types::Edge;

/// Graph in Compressed Sparse Row (CSR) format for fast graph traversal.
///
/// CSR format stores outgoing edges of each node contiguously in memory:
/// - `node_pointers[u]..node_pointers[u+1]` → edges from node `u`
/// - `edge_targets[i]` -> target node of edge `i`
/// - `edge_weights[i]` -> weight of edge `i`
/// - `edge_source_by_index[i]` -> source node of edge `i`
///
/// Vertices are the dense ids `0..num_nodes`; every vertex has a (possibly empty)
/// edge block. The structure is immutable once built, so one instance can be
/// shared between concurrent solver runs.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphCSR {
    pub num_nodes: usize,
    pub node_pointers: Vec<usize>,
    pub edge_targets: Vec<usize>,
    pub edge_weights: Vec<f64>,
    pub edge_source_by_index: Vec<usize>,
}

impl GraphCSR {
    /// Creates a new CSR graph from a list of edges `(src, dst, weight)`.
    ///
    /// Edges are stored sorted by source node to ensure contiguous blocks
    /// for each node. The sort is stable, so edges of one source keep their
    /// input order. Parallel edges and self-loops are kept as given.
    ///
    /// # Errors
    /// - `Error::DanglingEdge` if an endpoint is not in `0..num_nodes`.
    /// - `Error::NonFiniteWeight` if a weight is NaN or infinite.
    pub fn from_edges(num_nodes: usize, edges: &mut [Edge]) -> Result<Self, Error> {
        for &(u, v, weight) in edges.iter() {
            if u >= num_nodes || v >= num_nodes {
                return Err(Error::DanglingEdge(u, v));
            }
            if !weight.is_finite() {
                return Err(Error::NonFiniteWeight {
                    from: u,
                    to: v,
                    weight,
                });
            }
        }

        edges.sort_by_key(|(src, _, _)| *src);

        let (node_pointers, edge_targets, edge_weights, edge_source_by_index) =
            Self::build_csr_from_edges(num_nodes, edges);

        Ok(Self {
            num_nodes,
            node_pointers,
            edge_targets,
            edge_weights,
            edge_source_by_index,
        })
    }

    /// A graph with `num_nodes` vertices and no edges.
    pub fn empty(num_nodes: usize) -> Self {
        let (node_pointers, edge_targets, edge_weights, edge_source_by_index) =
            Self::build_csr_from_edges(num_nodes, &[]);
        Self {
            num_nodes,
            node_pointers,
            edge_targets,
            edge_weights,
            edge_source_by_index,
        }
    }

    /// Two-pass counting construction of the CSR arrays.
    ///
    /// `edge_source_by_index` lets a round scan every edge without walking
    /// `node_pointers`.
    fn build_csr_from_edges(
        num_nodes: usize,
        edges: &[Edge],
    ) -> (Vec<usize>, Vec<usize>, Vec<f64>, Vec<usize>) {
        let m = edges.len();
        let mut node_pointers = vec![0; num_nodes + 1];

        for &(u, _, _) in edges {
            node_pointers[u + 1] += 1;
        }

        for i in 1..=num_nodes {
            node_pointers[i] += node_pointers[i - 1];
        }

        let mut edge_targets = vec![0; m];
        let mut edge_weights = vec![0.0; m];
        let mut edge_source_by_index = vec![0; m];

        let mut cursor = node_pointers.clone();

        for &(u, v, weight) in edges {
            let pos = cursor[u];
            edge_weights[pos] = weight;
            edge_targets[pos] = v;
            edge_source_by_index[pos] = u;

            cursor[u] += 1;
        }

        (
            node_pointers,
            edge_targets,
            edge_weights,
            edge_source_by_index,
        )
    }

    /// Number of directed edges (an undirected edge counts twice).
    pub fn num_edges(&self) -> usize {
        self.edge_targets.len()
    }

    pub fn has_vertex(&self, vertex: usize) -> bool {
        vertex < self.num_nodes
    }

    /// Outgoing `(target, weight)` pairs of `u`. Empty for unknown vertices.
    pub fn outgoing(&self, u: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = if self.has_vertex(u) {
            self.node_pointers[u]..self.node_pointers[u + 1]
        } else {
            0..0
        };
        range.map(move |i| (self.edge_targets[i], self.edge_weights[i]))
    }

    /// Every edge as `(u, v, weight)`, grouped by source.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        (0..self.num_edges()).map(move |i| {
            (
                self.edge_source_by_index[i],
                self.edge_targets[i],
                self.edge_weights[i],
            )
        })
    }

    /// Weight of the cheapest edge `u -> v`, if any.
    pub fn edge_weight(&self, u: usize, v: usize) -> Option<f64> {
        self.outgoing(u)
            .filter(|&(target, _)| target == v)
            .map(|(_, weight)| weight)
            .reduce(f64::min)
    }

    pub fn has_negative_weight(&self) -> bool {
        self.edge_weights.iter().any(|&w| w < 0.0)
    }

    /// First edge (in CSR order) without a matching reverse edge.
    pub fn find_asymmetric_edge(&self) -> Option<(usize, usize)> {
        self.edges()
            .map(|(u, v, _)| (u, v))
            .find(|&(u, v)| !self.outgoing(v).any(|(target, _)| target == u))
    }

    /// Copy of the graph with one extra vertex (id `num_nodes`) joined to every
    /// original vertex by a zero-weight edge.
    ///
    /// Any cycle reachable from some vertex of the original graph is reachable
    /// from the virtual source. Returns the new graph and the virtual source id.
    pub fn with_virtual_source(&self) -> (Self, usize) {
        let source = self.num_nodes;
        let mut edges: Vec<Edge> = Vec::with_capacity(self.num_edges() + self.num_nodes);
        edges.extend(self.edges());
        edges.extend((0..self.num_nodes).map(|v| (source, v, 0.0)));

        let (node_pointers, edge_targets, edge_weights, edge_source_by_index) =
            Self::build_csr_from_edges(self.num_nodes + 1, &edges);

        let augmented = Self {
            num_nodes: self.num_nodes + 1,
            node_pointers,
            edge_targets,
            edge_weights,
            edge_source_by_index,
        };
        (augmented, source)
    }
}
